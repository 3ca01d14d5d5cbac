/// Well-known web/service framework tokens.
///
/// Matched as substrings, so broad tokens such as "gin" or "vue" also hit
/// unrelated namespaces that merely contain them.
pub const FRAMEWORK_TOKENS: &[&str] = &[
    "spring",
    "quarkus",
    "micronaut",
    "struts",
    "hibernate",
    "jakarta.ws",
    "vertx",
    "ktor",
    "akka",
    "django",
    "flask",
    "fastapi",
    "pyramid",
    "tornado",
    "express",
    "koa",
    "hapi",
    "nestjs",
    "angular",
    "react",
    "vue",
    "svelte",
    "nuxt",
    "gin",
    "fiber",
    "beego",
    "actix",
    "rocket",
    "axum",
    "rails",
    "sinatra",
    "laravel",
    "symfony",
    "aspnetcore",
];

/// FrameworkPolicy decides whether purl parts point at an application framework
///
/// Priority order:
/// 1. namespace contains a token (case-sensitive substring)
/// 2. lowercased name starts with a token
pub struct FrameworkPolicy;

impl FrameworkPolicy {
    /// Checks a purl namespace against the token list
    pub fn matches_namespace(namespace: &str) -> bool {
        FRAMEWORK_TOKENS.iter().any(|token| namespace.contains(token))
    }

    /// Checks a package name against the token list by prefix
    pub fn matches_name(name: &str) -> bool {
        let lowered = name.to_lowercase();
        FRAMEWORK_TOKENS.iter().any(|token| lowered.starts_with(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_namespace_substring() {
        assert!(FrameworkPolicy::matches_namespace("org.springframework.boot"));
        assert!(FrameworkPolicy::matches_namespace("github.com/gin-gonic"));
        assert!(FrameworkPolicy::matches_namespace("@angular"));
        assert!(!FrameworkPolicy::matches_namespace("org.apache.commons"));
    }

    #[test]
    fn test_matches_namespace_is_case_sensitive() {
        assert!(!FrameworkPolicy::matches_namespace("org.Springframework"));
    }

    #[test]
    fn test_matches_namespace_over_matches_embedded_tokens() {
        // "engine" embeds "gin"
        assert!(FrameworkPolicy::matches_namespace("com.example.engine"));
    }

    #[test]
    fn test_matches_name_prefix() {
        assert!(FrameworkPolicy::matches_name("Django-REST"));
        assert!(FrameworkPolicy::matches_name("express"));
        assert!(!FrameworkPolicy::matches_name("lodash"));
        assert!(!FrameworkPolicy::matches_name("my-django-helper"));
    }
}
