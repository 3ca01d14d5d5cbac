mod framework_policy;

pub use framework_policy::{FrameworkPolicy, FRAMEWORK_TOKENS};
