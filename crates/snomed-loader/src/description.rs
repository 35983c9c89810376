//! Parser for `sct2_Description_*.txt`.

use csv::StringRecord;
use snomed_types::Rf2Description;

use crate::parser::{parse, Rf2Record};
use crate::types::{DescriptionConfig, Rf2Config, Rf2Result};

const DESCRIPTION_COLUMNS: &[&str] = &[
    "id",
    "effectiveTime",
    "active",
    "moduleId",
    "conceptId",
    "languageCode",
    "typeId",
    "term",
    "caseSignificanceId",
];

impl Rf2Record for Rf2Description {
    const EXPECTED_COLUMNS: &'static [&'static str] = DESCRIPTION_COLUMNS;

    fn from_record(record: &StringRecord) -> Rf2Result<Self> {
        Ok(Rf2Description {
            id: parse::sctid(parse::field(record, 0, "id")?)?,
            effective_time: parse::effective_time(parse::field(record, 1, "effectiveTime")?)?,
            active: parse::boolean(parse::field(record, 2, "active")?)?,
            module_id: parse::sctid(parse::field(record, 3, "moduleId")?)?,
            concept_id: parse::sctid(parse::field(record, 4, "conceptId")?)?,
            language_code: parse::field(record, 5, "languageCode")?.to_string(),
            type_id: parse::sctid(parse::field(record, 6, "typeId")?)?,
            term: parse::field(record, 7, "term")?.to_string(),
            case_significance_id: parse::sctid(parse::field(record, 8, "caseSignificanceId")?)?,
        })
    }

    fn passes_filter(&self, config: &Rf2Config) -> bool {
        !config.active_only || self.active
    }
}

/// Language and type filtering on top of the base filter.
pub trait DescriptionFilter {
    /// Returns true if the description passes `config`.
    fn passes_description_filter(&self, config: &DescriptionConfig) -> bool;
}

impl DescriptionFilter for Rf2Description {
    fn passes_description_filter(&self, config: &DescriptionConfig) -> bool {
        self.passes_filter(&config.base)
            && (config.language_codes.is_empty()
                || config.language_codes.contains(&self.language_code))
            && (config.type_ids.is_empty() || config.type_ids.contains(&self.type_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Rf2Parser;
    use snomed_types::DescriptionType;

    fn make_description(language_code: &str, type_id: u64) -> Rf2Description {
        Rf2Description {
            id: 754786014,
            effective_time: 20020131,
            active: true,
            module_id: 900000000000207008,
            concept_id: 73211009,
            language_code: language_code.to_string(),
            type_id,
            term: "Diabetes mellitus".to_string(),
            case_significance_id: 900000000000448009,
        }
    }

    #[test]
    fn test_parse_description_record() {
        let record = StringRecord::from(vec![
            "754786014",
            "20020131",
            "1",
            "900000000000207008",
            "73211009",
            "en",
            "900000000000003001",
            "Diabetes mellitus (disorder)",
            "900000000000448009",
        ]);

        let desc = Rf2Description::from_record(&record).unwrap();
        assert_eq!(desc.concept_id, 73211009);
        assert_eq!(desc.term, "Diabetes mellitus (disorder)");
        assert!(desc.is_fsn());
    }

    #[test]
    fn test_terms_with_quotes_are_read_verbatim() {
        let input = "id\teffectiveTime\tactive\tmoduleId\tconceptId\tlanguageCode\ttypeId\tterm\tcaseSignificanceId\n\
            1000015\t20020131\t1\t900000000000207008\t73211009\ten\t900000000000013009\t\"Sugar\" diabetes\t900000000000448009\n";

        let descriptions =
            Rf2Parser::<_, Rf2Description>::from_reader(input.as_bytes(), Rf2Config::all_rows())
                .unwrap()
                .parse_all()
                .unwrap();

        assert_eq!(descriptions[0].term, "\"Sugar\" diabetes");
    }

    #[test]
    fn test_language_and_type_filter() {
        let config = DescriptionConfig::english_terms();

        assert!(make_description("en", DescriptionType::SYNONYM_ID).passes_description_filter(&config));
        assert!(!make_description("es", DescriptionType::SYNONYM_ID).passes_description_filter(&config));
        assert!(!make_description("en", DescriptionType::DEFINITION_ID).passes_description_filter(&config));
    }
}
