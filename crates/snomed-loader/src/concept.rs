//! Parser for `sct2_Concept_*.txt`.

use csv::StringRecord;
use snomed_types::Rf2Concept;

use crate::parser::{parse, Rf2Record};
use crate::types::{Rf2Config, Rf2Result};

const CONCEPT_COLUMNS: &[&str] = &[
    "id",
    "effectiveTime",
    "active",
    "moduleId",
    "definitionStatusId",
];

impl Rf2Record for Rf2Concept {
    const EXPECTED_COLUMNS: &'static [&'static str] = CONCEPT_COLUMNS;

    fn from_record(record: &StringRecord) -> Rf2Result<Self> {
        Ok(Rf2Concept {
            id: parse::sctid(parse::field(record, 0, "id")?)?,
            effective_time: parse::effective_time(parse::field(record, 1, "effectiveTime")?)?,
            active: parse::boolean(parse::field(record, 2, "active")?)?,
            module_id: parse::sctid(parse::field(record, 3, "moduleId")?)?,
            definition_status_id: parse::sctid(parse::field(record, 4, "definitionStatusId")?)?,
        })
    }

    fn passes_filter(&self, config: &Rf2Config) -> bool {
        !config.active_only || self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rf2Error;

    #[test]
    fn test_parse_concept_record() {
        let record = StringRecord::from(vec![
            "404684003",
            "20020131",
            "1",
            "900000000000207008",
            "900000000000074008",
        ]);

        let concept = Rf2Concept::from_record(&record).unwrap();
        assert_eq!(concept.id, 404684003);
        assert_eq!(concept.effective_time, 20020131);
        assert!(concept.active);
        assert!(concept.is_primitive());
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let record = StringRecord::from(vec!["404684003", "20020131", "1", "", "900000000000074008"]);

        assert!(matches!(
            Rf2Concept::from_record(&record),
            Err(Rf2Error::MissingField { column: "moduleId", .. })
        ));
    }

    #[test]
    fn test_filter_active_only() {
        let inactive = Rf2Concept {
            id: 100005,
            effective_time: 20020131,
            active: false,
            module_id: 900000000000207008,
            definition_status_id: 900000000000074008,
        };

        assert!(!inactive.passes_filter(&Rf2Config::default()));
        assert!(inactive.passes_filter(&Rf2Config::all_rows()));
    }
}
