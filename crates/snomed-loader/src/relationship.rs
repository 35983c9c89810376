//! Parser for `sct2_Relationship_*.txt`.

use csv::StringRecord;
use snomed_types::Rf2Relationship;

use crate::parser::{parse, Rf2Record};
use crate::types::{RelationshipConfig, Rf2Config, Rf2Result};

const RELATIONSHIP_COLUMNS: &[&str] = &[
    "id",
    "effectiveTime",
    "active",
    "moduleId",
    "sourceId",
    "destinationId",
    "relationshipGroup",
    "typeId",
    "characteristicTypeId",
    "modifierId",
];

impl Rf2Record for Rf2Relationship {
    const EXPECTED_COLUMNS: &'static [&'static str] = RELATIONSHIP_COLUMNS;

    fn from_record(record: &StringRecord) -> Rf2Result<Self> {
        Ok(Rf2Relationship {
            id: parse::sctid(parse::field(record, 0, "id")?)?,
            effective_time: parse::effective_time(parse::field(record, 1, "effectiveTime")?)?,
            active: parse::boolean(parse::field(record, 2, "active")?)?,
            module_id: parse::sctid(parse::field(record, 3, "moduleId")?)?,
            source_id: parse::sctid(parse::field(record, 4, "sourceId")?)?,
            destination_id: parse::sctid(parse::field(record, 5, "destinationId")?)?,
            relationship_group: parse::integer(parse::field(record, 6, "relationshipGroup")?)?,
            type_id: parse::sctid(parse::field(record, 7, "typeId")?)?,
            characteristic_type_id: parse::sctid(parse::field(
                record,
                8,
                "characteristicTypeId",
            )?)?,
            modifier_id: parse::sctid(parse::field(record, 9, "modifierId")?)?,
        })
    }

    fn passes_filter(&self, config: &Rf2Config) -> bool {
        !config.active_only || self.active
    }
}

/// Type and characteristic filtering applied while loading.
pub trait RelationshipLoadFilter {
    /// Returns true if the relationship passes `config`.
    fn passes_relationship_filter(&self, config: &RelationshipConfig) -> bool;
}

impl RelationshipLoadFilter for Rf2Relationship {
    fn passes_relationship_filter(&self, config: &RelationshipConfig) -> bool {
        self.passes_filter(&config.base)
            && (config.type_ids.is_empty() || config.type_ids.contains(&self.type_id))
            && (config.characteristic_type_ids.is_empty()
                || config
                    .characteristic_type_ids
                    .contains(&self.characteristic_type_id))
    }
}
