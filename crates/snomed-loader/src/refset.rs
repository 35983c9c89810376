//! Parser for language reference set files (`der2_cRefset_Language*.txt`).

use csv::StringRecord;
use snomed_types::Rf2LanguageRefsetMember;

use crate::parser::{parse, Rf2Record};
use crate::types::{Rf2Config, Rf2Result};

const LANGUAGE_REFSET_COLUMNS: &[&str] = &[
    "id",
    "effectiveTime",
    "active",
    "moduleId",
    "refsetId",
    "referencedComponentId",
    "acceptabilityId",
];

impl Rf2Record for Rf2LanguageRefsetMember {
    const EXPECTED_COLUMNS: &'static [&'static str] = LANGUAGE_REFSET_COLUMNS;

    fn from_record(record: &StringRecord) -> Rf2Result<Self> {
        Ok(Self {
            id: parse::field(record, 0, "id")?.to_string(),
            effective_time: parse::effective_time(parse::field(record, 1, "effectiveTime")?)?,
            active: parse::boolean(parse::field(record, 2, "active")?)?,
            module_id: parse::sctid(parse::field(record, 3, "moduleId")?)?,
            refset_id: parse::sctid(parse::field(record, 4, "refsetId")?)?,
            referenced_component_id: parse::sctid(parse::field(
                record,
                5,
                "referencedComponentId",
            )?)?,
            acceptability_id: parse::sctid(parse::field(record, 6, "acceptabilityId")?)?,
        })
    }

    fn passes_filter(&self, config: &Rf2Config) -> bool {
        !config.active_only || self.active
    }
}
