//! Loading a whole release into memory.

use std::path::{Path, PathBuf};

use snomed_types::{Rf2Concept, Rf2Description, Rf2LanguageRefsetMember, Rf2Relationship};
use tracing::{debug, info, instrument};

use crate::description::DescriptionFilter;
use crate::parser::{Rf2Parser, Rf2Record};
use crate::relationship::RelationshipLoadFilter;
use crate::types::{LoadConfig, ReleaseKind, Rf2Config, Rf2Error, Rf2Files, Rf2Result};

/// The parsed rows of one RF2 release.
#[derive(Debug, Clone, Default)]
pub struct Rf2Release {
    /// Snapshot or Full.
    pub kind: ReleaseKind,
    /// Release date (YYYYMMDD), when the file names carry one.
    pub release_date: Option<String>,
    /// Concept rows.
    pub concepts: Vec<Rf2Concept>,
    /// Description rows from every description file.
    pub descriptions: Vec<Rf2Description>,
    /// Inferred relationship rows.
    pub relationships: Vec<Rf2Relationship>,
    /// Language refset rows from every language refset file.
    pub language_refsets: Vec<Rf2LanguageRefsetMember>,
}

impl Rf2Release {
    /// Parses every file in `files`.
    ///
    /// With the `parallel` feature the four file kinds are parsed
    /// concurrently. The first malformed row in any file fails the load.
    #[instrument(skip_all, fields(kind = files.kind.file_token()))]
    pub fn load(files: &Rf2Files, config: &LoadConfig) -> Rf2Result<Self> {
        let concept_file = required(&files.concept_file, "Concept")?;
        let relationship_file = required(&files.relationship_file, "Relationship")?;

        #[cfg(feature = "parallel")]
        let ((concepts, descriptions), (relationships, language_refsets)) = rayon::join(
            || {
                rayon::join(
                    || parse_files(&[concept_file], &config.concepts, |_: &Rf2Concept| true),
                    || {
                        parse_files(
                            &files.description_files,
                            &config.descriptions.base,
                            |d: &Rf2Description| d.passes_description_filter(&config.descriptions),
                        )
                    },
                )
            },
            || {
                rayon::join(
                    || {
                        parse_files(
                            &[relationship_file],
                            &config.relationships.base,
                            |r: &Rf2Relationship| {
                                r.passes_relationship_filter(&config.relationships)
                            },
                        )
                    },
                    || {
                        parse_files(
                            &files.language_refset_files,
                            &config.language_refsets,
                            |_: &Rf2LanguageRefsetMember| true,
                        )
                    },
                )
            },
        );

        #[cfg(not(feature = "parallel"))]
        let ((concepts, descriptions), (relationships, language_refsets)) = (
            (
                parse_files(&[concept_file], &config.concepts, |_: &Rf2Concept| true),
                parse_files(
                    &files.description_files,
                    &config.descriptions.base,
                    |d: &Rf2Description| d.passes_description_filter(&config.descriptions),
                ),
            ),
            (
                parse_files(
                    &[relationship_file],
                    &config.relationships.base,
                    |r: &Rf2Relationship| r.passes_relationship_filter(&config.relationships),
                ),
                parse_files(
                    &files.language_refset_files,
                    &config.language_refsets,
                    |_: &Rf2LanguageRefsetMember| true,
                ),
            ),
        );

        let release = Self {
            kind: files.kind,
            release_date: files.release_date.clone(),
            concepts: concepts?,
            descriptions: descriptions?,
            relationships: relationships?,
            language_refsets: language_refsets?,
        };

        info!(
            concepts = release.concepts.len(),
            descriptions = release.descriptions.len(),
            relationships = release.relationships.len(),
            language_refsets = release.language_refsets.len(),
            "loaded RF2 release"
        );

        Ok(release)
    }
}

fn required<'a>(path: &'a Option<PathBuf>, file_type: &str) -> Rf2Result<&'a Path> {
    path.as_deref().ok_or_else(|| Rf2Error::RequiredFileMissing {
        file_type: file_type.to_string(),
        directory: "release file set".to_string(),
    })
}

fn parse_files<T, P, F>(paths: &[P], config: &Rf2Config, keep: F) -> Rf2Result<Vec<T>>
where
    T: Rf2Record,
    P: AsRef<Path>,
    F: Fn(&T) -> bool,
{
    let mut rows = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let parser = Rf2Parser::<_, T>::from_path(path, config.clone())?;
        let (parsed, stats) = parser.parse_all_with_stats()?;
        let before = rows.len();
        rows.extend(parsed.into_iter().filter(|row| keep(row)));
        debug!(
            file = %path.display(),
            total = stats.total_records,
            kept = rows.len() - before,
            elapsed_ms = stats.parse_time_ms,
            "parsed RF2 file"
        );
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discover_rf2_files;
    use crate::types::RelationshipConfig;
    use std::fs;
    use tempfile::TempDir;

    const CONCEPTS: &str = "id\teffectiveTime\tactive\tmoduleId\tdefinitionStatusId\n\
        138875005\t20020131\t1\t900000000000207008\t900000000000074008\n\
        404684003\t20020131\t1\t900000000000207008\t900000000000074008\n\
        73211009\t20020131\t0\t900000000000207008\t900000000000074008\n";

    const DESCRIPTIONS: &str = "id\teffectiveTime\tactive\tmoduleId\tconceptId\tlanguageCode\ttypeId\tterm\tcaseSignificanceId\n\
        754786014\t20020131\t1\t900000000000207008\t404684003\ten\t900000000000013009\tClinical finding\t900000000000448009\n";

    const RELATIONSHIPS: &str = "id\teffectiveTime\tactive\tmoduleId\tsourceId\tdestinationId\trelationshipGroup\ttypeId\tcharacteristicTypeId\tmodifierId\n\
        100000028\t20020131\t1\t900000000000207008\t404684003\t138875005\t0\t116680003\t900000000000011006\t900000000000451002\n\
        100001029\t20020131\t1\t900000000000207008\t73211009\t404684003\t0\t363698007\t900000000000011006\t900000000000451002\n";

    const LANGUAGE: &str = "id\teffectiveTime\tactive\tmoduleId\trefsetId\treferencedComponentId\tacceptabilityId\n\
        800aa109-431f-4407-a431-6fe65e9db160\t20020131\t1\t900000000000207008\t900000000000509007\t754786014\t900000000000548007\n";

    fn make_release() -> TempDir {
        let dir = TempDir::new().unwrap();
        let term = dir.path().join("Snapshot").join("Terminology");
        let lang = dir.path().join("Snapshot").join("Refset").join("Language");
        fs::create_dir_all(&term).unwrap();
        fs::create_dir_all(&lang).unwrap();
        fs::write(term.join("sct2_Concept_Snapshot_INT_20020131.txt"), CONCEPTS).unwrap();
        fs::write(
            term.join("sct2_Description_Snapshot-en_INT_20020131.txt"),
            DESCRIPTIONS,
        )
        .unwrap();
        fs::write(
            term.join("sct2_Relationship_Snapshot_INT_20020131.txt"),
            RELATIONSHIPS,
        )
        .unwrap();
        fs::write(
            lang.join("der2_cRefset_LanguageSnapshot-en_INT_20020131.txt"),
            LANGUAGE,
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_load_release_keeps_every_row_by_default() {
        let dir = make_release();
        let files = discover_rf2_files(dir.path(), ReleaseKind::Snapshot).unwrap();
        let release = Rf2Release::load(&files, &LoadConfig::default()).unwrap();

        assert_eq!(release.release_date.as_deref(), Some("20020131"));
        assert_eq!(release.concepts.len(), 3);
        assert_eq!(release.descriptions.len(), 1);
        assert_eq!(release.relationships.len(), 2);
        assert_eq!(release.language_refsets.len(), 1);
    }

    #[test]
    fn test_load_release_applies_relationship_filter() {
        let dir = make_release();
        let files = discover_rf2_files(dir.path(), ReleaseKind::Snapshot).unwrap();
        let config = LoadConfig {
            concepts: Rf2Config::default(),
            relationships: RelationshipConfig::is_a_only(),
            ..LoadConfig::default()
        };
        let release = Rf2Release::load(&files, &config).unwrap();

        assert_eq!(release.concepts.len(), 2);
        assert_eq!(release.relationships.len(), 1);
        assert!(release.relationships[0].is_is_a());
    }

    #[test]
    fn test_load_release_fails_on_malformed_row() {
        let dir = make_release();
        fs::write(
            dir.path()
                .join("Snapshot/Terminology/sct2_Concept_Snapshot_INT_20020131.txt"),
            "id\teffectiveTime\tactive\tmoduleId\tdefinitionStatusId\nabc\t20020131\t1\t1\t1\n",
        )
        .unwrap();
        let files = discover_rf2_files(dir.path(), ReleaseKind::Snapshot).unwrap();

        assert!(matches!(
            Rf2Release::load(&files, &LoadConfig::default()),
            Err(Rf2Error::InvalidSctId { .. })
        ));
    }
}
