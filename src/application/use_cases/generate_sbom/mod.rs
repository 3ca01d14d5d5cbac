use crate::application::dto::{SbomRequest, SbomResponse};
use crate::application::factories::FormatterFactory;
use crate::ports::inbound::BomGenerationPort;
use crate::ports::outbound::{ProgressReporter, ScanResult, ScanSource};
use crate::sbom_generation::domain::{
    Bom, Component, Dependency, ImageProvenance, Service, ToolIdentity,
};
use crate::sbom_generation::services::{
    BomFilter, ComponentRegistry, ComponentTrimmer, DependencyMerger, MetadataComposer,
    PackageNormalizer, ParentComponentResolver, RegistrationStats,
};
use crate::shared::{Result, SbomError};
use std::collections::BTreeSet;

/// Graph assembled from every scan pass, before the header is composed
struct AssembledGraph {
    parent: Option<Component>,
    components: Vec<Component>,
    services: Vec<Service>,
    dependencies: Vec<Dependency>,
    stats: RegistrationStats,
}

/// GenerateSbomUseCase - Core use case for BOM assembly
///
/// Runs every scan pass of one request against a fresh registry, composes the
/// header, applies the post-generation filter and serializes the result.
///
/// # Type Parameters
/// * `S` - ScanSource implementation
/// * `PR` - ProgressReporter implementation
pub struct GenerateSbomUseCase<S, PR> {
    scan_source: S,
    progress_reporter: PR,
    tool: ToolIdentity,
}

impl<S, PR> GenerateSbomUseCase<S, PR>
where
    S: ScanSource,
    PR: ProgressReporter,
{
    /// Creates a new GenerateSbomUseCase with injected dependencies
    pub fn new(scan_source: S, progress_reporter: PR) -> Self {
        Self {
            scan_source,
            progress_reporter,
            tool: ToolIdentity::default(),
        }
    }

    /// Overrides the tool identity written to the BOM header
    pub fn with_tool(mut self, tool: ToolIdentity) -> Self {
        self.tool = tool;
        self
    }

    /// Executes the BOM generation use case
    ///
    /// # Errors
    /// Returns an error if an input cannot be read, the filter criteria are
    /// invalid, the filter removed every component, or serialization fails.
    pub fn execute(&self, request: SbomRequest) -> Result<SbomResponse> {
        // Step 1: Read every scan pass
        let scans = self.read_scans(&request)?;

        // Step 2: Register components and merge edges pass by pass
        let graph = self.assemble(&request, &scans);
        self.progress_reporter.report(&format!(
            "✅ Registered {} component(s) from {} scan pass(es)",
            graph.components.len(),
            scans.len()
        ));

        // Step 3: Compose the header
        let provenance = self.read_provenance(&request)?;
        let metadata = MetadataComposer::compose(
            self.tool.clone(),
            request.authors.clone(),
            graph.parent,
            provenance.as_ref(),
        );
        let bom = Bom::new(
            request.spec_version,
            metadata,
            graph.components,
            graph.services,
            graph.dependencies,
        );

        // Step 4: Post-generation filter and summary
        let original_component_count = bom.components().len();
        let (bom, unmatched_patterns) = self.apply_filter(bom, &request)?;
        let bom = MetadataComposer::apply_summary(bom);

        // Step 5: Serialize
        self.progress_reporter
            .report(FormatterFactory::progress_message(request.format));
        let content = FormatterFactory::create(request.format).format(&bom)?;

        Ok(SbomResponse {
            bom,
            content,
            original_component_count,
            stats: graph.stats,
            unmatched_patterns,
        })
    }

    fn read_scans(&self, request: &SbomRequest) -> Result<Vec<ScanResult>> {
        let total = request.scan_paths.len();
        let mut scans = Vec::with_capacity(total);
        for (index, path) in request.scan_paths.iter().enumerate() {
            self.progress_reporter.report_progress(
                index + 1,
                total,
                Some(format!("📖 Loading scan result: {}", path.display()).as_str()),
            );
            scans.push(self.scan_source.read_scan(path)?);
        }
        Ok(scans)
    }

    fn read_provenance(&self, request: &SbomRequest) -> Result<Option<ImageProvenance>> {
        request
            .image_metadata
            .as_deref()
            .map(|path| {
                self.progress_reporter.report(&format!(
                    "🐳 Reading image metadata from: {}",
                    path.display()
                ));
                self.scan_source.read_image_metadata(path)
            })
            .transpose()
    }

    /// Runs every scan pass against one registry
    ///
    /// The first scan's declared root feeds the parent component. Roots of
    /// later scans become sub-components of the parent, linked from its edge.
    fn assemble(&self, request: &SbomRequest, scans: &[ScanResult]) -> AssembledGraph {
        let mut registry = ComponentRegistry::new();
        let mut dependencies: Vec<Dependency> = Vec::new();
        let mut services: Vec<Service> = Vec::new();

        let mut parent = scans.first().and_then(|first| {
            let normalizer = PackageNormalizer::new(&first.ecosystem, request.spec_version);
            ParentComponentResolver::resolve(
                request.project.as_ref(),
                first.root.as_ref(),
                &request.project_path,
                &normalizer,
            )
        });

        for (index, scan) in scans.iter().enumerate() {
            let normalizer = PackageNormalizer::new(&scan.ecosystem, request.spec_version);
            let edges_before = registry.edges().len();
            let mut pass_edges = Vec::new();

            if let Some(root) = &scan.root {
                let targets = registry.register_root(&normalizer, root);
                match parent.as_mut() {
                    Some(parent) if index == 0 => {
                        pass_edges.push(Dependency::new(parent.bom_ref.clone(), targets));
                    }
                    Some(parent) => {
                        if let Some(sub) = normalizer.normalize(root) {
                            pass_edges.push(Dependency::new(
                                parent.bom_ref.clone(),
                                [sub.bom_ref.clone()],
                            ));
                            pass_edges.push(Dependency::new(sub.bom_ref.clone(), targets));
                            parent.components.push(sub);
                        }
                    }
                    None => {
                        tracing::debug!(
                            root = %root.name,
                            "no parent component, root dependencies are flattened"
                        );
                    }
                }
            }

            registry.register_all(&normalizer, &scan.packages);
            pass_edges.extend(registry.edges()[edges_before..].iter().cloned());
            pass_edges.extend(scan.dependencies.iter().cloned());

            dependencies = DependencyMerger::merge(dependencies, pass_edges, parent.as_ref());
            services.extend(scan.services.iter().cloned());
        }

        let stats = registry.stats();
        let (components, _) = registry.into_parts();
        let (parent, dependencies) = match parent {
            Some(parent) => {
                let (parent, dependencies) = Self::settle_parent(parent, dependencies, &components);
                (Some(parent), dependencies)
            }
            None => (None, dependencies),
        };
        AssembledGraph {
            parent,
            components,
            services: ComponentTrimmer::trim(services),
            dependencies,
            stats,
        }
    }

    /// Cleans the parent once every sub-component is known
    ///
    /// When cleaning collapses the parent or drops a sub-component, edges
    /// keyed by the retired refs move onto the surviving root so no edge names
    /// a component absent from the BOM.
    fn settle_parent(
        parent: Component,
        dependencies: Vec<Dependency>,
        components: &[Component],
    ) -> (Component, Vec<Dependency>) {
        let candidates: Vec<String> = std::iter::once(parent.bom_ref.clone())
            .chain(parent.components.iter().map(|c| c.bom_ref.clone()))
            .collect();
        let parent = MetadataComposer::clean_parent(parent);

        let retired: BTreeSet<String> = candidates
            .into_iter()
            .filter(|r| *r != parent.bom_ref)
            .filter(|r| !parent.components.iter().any(|c| &c.bom_ref == r))
            .filter(|r| !components.iter().any(|c| &c.bom_ref == r))
            .collect();
        if retired.is_empty() {
            return (parent, dependencies);
        }

        tracing::debug!(?retired, root = %parent.bom_ref, "re-keying edges of retired root refs");
        let dependencies = DependencyMerger::rekey(dependencies, &retired, &parent);
        (parent, dependencies)
    }

    /// Applies the post-generation filter, reporting removals and unmatched strings
    ///
    /// # Errors
    /// Returns [`SbomError::EmptyBom`] when the filter removed every component
    fn apply_filter(&self, bom: Bom, request: &SbomRequest) -> Result<(Bom, Vec<String>)> {
        let original_count = bom.components().len();
        if original_count == 0 {
            self.progress_reporter
                .report_error("⚠️  Warning: No components were found in the scan results.");
        }
        if request.criteria.is_empty() {
            return Ok((bom, Vec::new()));
        }

        let filter = BomFilter::new(request.criteria.clone())?;
        let bom = filter.apply(bom);

        let removed = original_count - bom.components().len();
        if removed > 0 {
            self.progress_reporter.report(&format!(
                "🚫 Removed {} component(s) based on filters",
                removed
            ));
        }
        if original_count > 0 && bom.components().is_empty() {
            return Err(SbomError::EmptyBom { original_count }.into());
        }

        let unmatched = filter.get_unmatched_patterns();
        for pattern in &unmatched {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: Filter string '{}' did not match any component.",
                pattern
            ));
        }

        Ok((bom, unmatched))
    }
}

impl<S, PR> BomGenerationPort for GenerateSbomUseCase<S, PR>
where
    S: ScanSource,
    PR: ProgressReporter,
{
    fn generate_bom(&self, request: SbomRequest) -> Result<SbomResponse> {
        self.execute(request)
    }
}
