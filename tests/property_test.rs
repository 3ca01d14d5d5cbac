/// Property-based tests for the assembly engine
use proptest::prelude::*;
use sbom_assembler::prelude::*;
use std::collections::BTreeSet;

fn package_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,8}"
}

fn version() -> impl Strategy<Value = String> {
    (0u8..4, 0u8..4).prop_map(|(major, minor)| format!("{}.{}.0", major, minor))
}

fn raw_packages() -> impl Strategy<Value = Vec<RawPackage>> {
    prop::collection::vec((package_name(), version()), 0..40)
        .prop_map(|pairs| {
            pairs
                .into_iter()
                .map(|(name, version)| RawPackage::new(name, version))
                .collect()
        })
}

fn bom_for(components: Vec<Component>, spec: SpecVersion) -> Bom {
    let metadata = SbomMetadata::new(
        "2024-01-01T00:00:00Z".to_string(),
        "urn:uuid:proptest".to_string(),
        Default::default(),
        Vec::new(),
    );
    Bom::new(spec, metadata, components, Vec::new(), Vec::new())
}

proptest! {
    #[test]
    fn prop_registry_holds_one_component_per_purl(packages in raw_packages()) {
        let normalizer = PackageNormalizer::new("npm", SpecVersion::V1_6);
        let mut registry = ComponentRegistry::new();
        registry.register_all(&normalizer, &packages);

        let purls: Vec<String> = registry
            .components()
            .filter_map(|c| c.purl.clone())
            .collect();
        let unique: BTreeSet<&String> = purls.iter().collect();
        prop_assert_eq!(purls.len(), unique.len());

        let expected: BTreeSet<(String, String)> = packages
            .iter()
            .map(|p| (p.name.clone(), p.version.clone()))
            .collect();
        prop_assert_eq!(registry.len(), expected.len());
    }

    #[test]
    fn prop_nested_chain_with_back_reference_terminates(depth in 1usize..60) {
        // chain p0 -> p1 -> ... -> pN, the last node pointing back at p0
        let mut node = RawPackage::new(format!("p{}", depth), "1.0.0")
            .with_back_reference("p0", "pkg:npm/p0@1.0.0");
        for i in (0..depth).rev() {
            node = RawPackage::new(format!("p{}", i), "1.0.0")
                .with_dependency(format!("p{}", i + 1), node);
        }

        let normalizer = PackageNormalizer::new("npm", SpecVersion::V1_6);
        let mut registry = ComponentRegistry::new();
        registry.register_package(&normalizer, &node);
        // revisiting the root record registers nothing new
        registry.register_package(&normalizer, &node);

        prop_assert_eq!(registry.len(), depth + 1);
        prop_assert_eq!(registry.edges().len(), depth + 1);
    }

    #[test]
    fn prop_trim_keeps_first_occurrences_in_order(packages in raw_packages()) {
        let normalizer = PackageNormalizer::new("pypi", SpecVersion::V1_6);
        let components: Vec<Component> =
            packages.iter().filter_map(|p| normalizer.normalize(p)).collect();

        let trimmed = ComponentTrimmer::trim(components.clone());

        let mut seen = BTreeSet::new();
        let expected: Vec<&Component> = components
            .iter()
            .filter(|c| seen.insert(c.purl.clone().unwrap_or_default().to_lowercase()))
            .collect();
        prop_assert_eq!(trimmed.iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn prop_json_and_xml_carry_the_same_purls(packages in raw_packages()) {
        let normalizer = PackageNormalizer::new("npm", SpecVersion::V1_5);
        let components: Vec<Component> =
            packages.iter().filter_map(|p| normalizer.normalize(p)).collect();
        let bom = bom_for(components, SpecVersion::V1_5);

        let json = CycloneDxJsonFormatter::new().format(&bom).unwrap();
        let xml = CycloneDxXmlFormatter::new().format(&bom).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let json_purls: BTreeSet<String> = value["components"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|c| c["purl"].as_str().map(str::to_string))
            .collect();
        let xml_purls: BTreeSet<String> = xml
            .split("<purl>")
            .skip(1)
            .filter_map(|rest| rest.split("</purl>").next())
            .map(str::to_string)
            .collect();
        prop_assert_eq!(json_purls, xml_purls);
    }

    #[test]
    fn prop_filter_never_leaves_dangling_edges(
        packages in raw_packages(),
        needle in "[a-z]{1,2}",
    ) {
        let normalizer = PackageNormalizer::new("npm", SpecVersion::V1_6);
        let components: Vec<Component> = ComponentTrimmer::trim(
            packages.iter().filter_map(|p| normalizer.normalize(p)).collect(),
        );
        let refs: Vec<String> = components.iter().map(|c| c.bom_ref.clone()).collect();
        // every component depends on every later one
        let dependencies: Vec<Dependency> = refs
            .iter()
            .enumerate()
            .map(|(i, r)| Dependency::new(r.clone(), refs[i + 1..].iter().cloned()))
            .collect();
        let metadata = SbomMetadata::new(
            "2024-01-01T00:00:00Z".to_string(),
            "urn:uuid:proptest".to_string(),
            Default::default(),
            Vec::new(),
        );
        let bom = Bom::new(SpecVersion::V1_6, metadata, components, Vec::new(), dependencies);

        let filter = BomFilter::new(FilterCriteria {
            filter: vec![needle],
            ..FilterCriteria::default()
        })
        .unwrap();
        let filtered = filter.apply(bom);

        let surviving: BTreeSet<&str> =
            filtered.components().iter().map(|c| c.bom_ref.as_str()).collect();
        for dependency in filtered.dependencies() {
            prop_assert!(surviving.contains(dependency.bom_ref.as_str()));
            for target in &dependency.depends_on {
                prop_assert!(surviving.contains(target.as_str()));
            }
        }
    }
}
