use std::{cmp::Ordering, fmt::Write, path::Path};

use anyhow::{anyhow, Context};
use log::debug;

use crate::{
    declaration::ComponentDeclaration,
    model::{ConfigurationMetadata, DependencyDescriptor},
    version::Version,
    DependencyManagementServices,
};

/// Handler to inspect command
/// Builds the metadata of the declaration at `file` and renders either every
/// configuration or the inherited view of a single one.
pub fn do_inspect(
    services: &DependencyManagementServices,
    file: &Path,
    configuration: Option<&str>,
) -> anyhow::Result<String> {
    let declaration = ComponentDeclaration::from_file(file)
        .with_context(|| format!("Could not read {}", file.display()))?;
    let metadata = services.component_metadata(&declaration)?;
    debug!(
        "Built {} with {} configurations",
        metadata.id(),
        metadata.configurations().len()
    );

    let mut out = String::new();
    writeln!(out, "{}", metadata.id())?;
    match configuration {
        None => {
            for configuration in metadata.configurations() {
                render_configuration(&mut out, configuration)?;
            }
        }
        Some(name) => {
            let hierarchy = metadata
                .hierarchy(name)
                .ok_or_else(|| anyhow!("Unknown configuration `{name}`"))?;
            let names: Vec<&str> = hierarchy.iter().map(|c| c.name()).collect();
            writeln!(out, "{}", names.join(" <- "))?;
            for rule in metadata.effective_excludes(name).unwrap_or_default() {
                writeln!(out, "  exclude {rule}")?;
            }
            for dependency in metadata.effective_dependencies(name).unwrap_or_default() {
                render_dependency(&mut out, dependency)?;
            }
        }
    }
    Ok(out)
}

/// Handler to compare command
pub fn do_compare(
    services: &DependencyManagementServices,
    left: &str,
    right: &str,
) -> anyhow::Result<String> {
    let symbol = match services.comparator().compare_str(left, right) {
        Ordering::Less => "<",
        Ordering::Equal => "==",
        Ordering::Greater => ">",
    };
    Ok(format!("{left} {symbol} {right}\n"))
}

/// Handler to sort command
/// Prints versions in ascending order; dynamic selectors are flagged.
pub fn do_sort(
    services: &DependencyManagementServices,
    versions: &[String],
) -> anyhow::Result<String> {
    let comparator = services.comparator();
    let mut versions: Vec<Version> = versions.iter().map(Version::new).collect();
    comparator.sort(&mut versions);

    let mut out = String::new();
    for version in &versions {
        if comparator.is_dynamic(version) {
            writeln!(out, "{version} (dynamic)")?;
        } else {
            writeln!(out, "{version}")?;
        }
    }
    if let Some(max) = comparator.max_static(&versions) {
        writeln!(out, "latest: {max}")?;
    }
    Ok(out)
}

fn render_configuration(
    out: &mut String,
    configuration: &ConfigurationMetadata,
) -> anyhow::Result<()> {
    if configuration.extends_from().is_empty() {
        writeln!(out, "{}", configuration.name())?;
    } else {
        writeln!(
            out,
            "{} extends {}",
            configuration.name(),
            configuration.extends_from().join(", ")
        )?;
    }
    for artifact in configuration.artifacts() {
        writeln!(out, "  artifact {artifact}")?;
    }
    for rule in configuration.exclude_rules() {
        writeln!(out, "  exclude {rule}")?;
    }
    for dependency in configuration.dependencies() {
        render_dependency(out, dependency)?;
    }
    Ok(())
}

fn render_dependency(out: &mut String, dependency: &DependencyDescriptor) -> anyhow::Result<()> {
    write!(out, "  dependency {}", dependency.target)?;
    if dependency.forced {
        write!(out, " (forced)")?;
    }
    if !dependency.transitive {
        write!(out, " (intransitive)")?;
    }
    for rule in &dependency.exclude_rules {
        write!(out, " -{rule}")?;
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use std::io::Write as _;

    const DECLARATION: &str = r#"
        group = "org.example"
        name = "app"
        version = "1.0.0"

        [configurations.api]
        excludes = [{ group = "commons-logging" }]
        dependencies = [{ module = "org.slf4j:slf4j-api", version = "2.0.+", force = true }]

        [configurations.implementation]
        extends_from = ["api"]
        dependencies = [
            { project = ":core", configuration = "apiElements", transitive = false },
            { module = "com.google.guava:guava", version = "33.0-jre", excludes = [{ group = "com.google.code.findbugs" }] },
        ]
    "#;

    fn declaration_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{DECLARATION}").unwrap();
        file
    }

    #[test]
    fn inspect_all_configurations() {
        let services = DependencyManagementServices::builder().build();
        let file = declaration_file();
        let out = do_inspect(&services, file.path(), None).unwrap();
        assert_eq!(
            out,
            "org.example:app:1.0.0\n\
             api\n  exclude commons-logging:*\n  dependency org.slf4j:slf4j-api:2.0.+ (forced)\n\
             implementation extends api\n  dependency project :core (apiElements) (intransitive)\n  dependency com.google.guava:guava:33.0-jre -com.google.code.findbugs:*\n"
        );
    }

    #[test]
    fn inspect_one_configuration() {
        let services = DependencyManagementServices::builder().build();
        let file = declaration_file();
        let out = do_inspect(&services, file.path(), Some("implementation")).unwrap();
        assert_eq!(
            out,
            "org.example:app:1.0.0\n\
             implementation <- api\n  exclude commons-logging:*\n  dependency project :core (apiElements) (intransitive)\n  dependency com.google.guava:guava:33.0-jre -com.google.code.findbugs:*\n  dependency org.slf4j:slf4j-api:2.0.+ (forced)\n"
        );
    }

    #[test]
    fn inspect_unknown_configuration() {
        let services = DependencyManagementServices::builder().build();
        let file = declaration_file();
        assert!(do_inspect(&services, file.path(), Some("runtime")).is_err());
    }

    #[test]
    fn inspect_missing_file() {
        let services = DependencyManagementServices::builder().build();
        let dir = tempfile::tempdir().unwrap();
        assert!(do_inspect(&services, &dir.path().join("missing.toml"), None).is_err());
    }

    #[test]
    fn compare() {
        let services = DependencyManagementServices::builder().build();
        assert_eq!(do_compare(&services, "1.0-rc", "1.0").unwrap(), "1.0-rc < 1.0\n");
        assert_eq!(do_compare(&services, "1.0", "1.0.0").unwrap(), "1.0 == 1.0.0\n");
        assert_eq!(do_compare(&services, "1.10", "1.9").unwrap(), "1.10 > 1.9\n");
    }

    #[test]
    fn sort() {
        let services = DependencyManagementServices::builder().build();
        let versions = ["2.0", "1.0", "1.+", "1.0-rc"].map(String::from);
        assert_eq!(
            do_sort(&services, &versions).unwrap(),
            "1.0-rc\n1.0\n1.+ (dynamic)\n2.0\nlatest: 2.0\n"
        );
    }
}
