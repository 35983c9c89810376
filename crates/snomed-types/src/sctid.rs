//! SNOMED CT Identifier (SCTID) type and validation.
//!
//! SCTIDs are 64-bit unsigned integers. The last digit is a Verhoeff check
//! digit and the two digits before it are the partition identifier, which
//! says whether the id names a concept, a description or a relationship and
//! whether it lives in the international edition or an extension.

/// A SNOMED CT identifier (SCTID).
///
/// # Examples
///
/// ```
/// use snomed_types::SctId;
///
/// let concept_id: SctId = 73211009; // Diabetes mellitus
/// let is_a_type: SctId = 116680003; // IS_A relationship type
/// ```
pub type SctId = u64;

/// Largest value an SCTID may take (18 digits).
pub const MAX_SCTID: SctId = 999_999_999_999_999_999;

/// Smallest valid SCTID (6 digits: at least 3 item digits, partition, check).
pub const MIN_SCTID: SctId = 100_000;

const VERHOEFF_D: [[u8; 10]; 10] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
    [1, 2, 3, 4, 0, 6, 7, 8, 9, 5],
    [2, 3, 4, 0, 1, 7, 8, 9, 5, 6],
    [3, 4, 0, 1, 2, 8, 9, 5, 6, 7],
    [4, 0, 1, 2, 3, 9, 5, 6, 7, 8],
    [5, 9, 8, 7, 6, 0, 4, 3, 2, 1],
    [6, 5, 9, 8, 7, 1, 0, 4, 3, 2],
    [7, 6, 5, 9, 8, 2, 1, 0, 4, 3],
    [8, 7, 6, 5, 9, 3, 2, 1, 0, 4],
    [9, 8, 7, 6, 5, 4, 3, 2, 1, 0],
];

const VERHOEFF_P: [[u8; 10]; 8] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
    [1, 5, 7, 6, 2, 8, 3, 0, 9, 4],
    [5, 8, 0, 3, 7, 9, 6, 1, 4, 2],
    [8, 9, 1, 6, 0, 4, 3, 5, 2, 7],
    [9, 4, 5, 3, 1, 2, 6, 8, 7, 0],
    [4, 2, 8, 6, 5, 7, 3, 9, 0, 1],
    [2, 7, 9, 3, 8, 0, 6, 4, 1, 5],
    [7, 0, 4, 6, 9, 1, 3, 2, 5, 8],
];

/// The component kind encoded in an SCTID partition identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    /// A concept id (partition `00` or `10`).
    Concept,
    /// A description id (partition `01` or `11`).
    Description,
    /// A relationship id (partition `02` or `12`).
    Relationship,
}

/// Returns true if the Verhoeff check digit of `id` is correct.
pub fn has_valid_check_digit(id: SctId) -> bool {
    let mut check = 0u8;
    let mut rest = id;
    let mut position = 0usize;

    loop {
        let digit = (rest % 10) as usize;
        let permuted = VERHOEFF_P[position % 8][digit] as usize;
        check = VERHOEFF_D[check as usize][permuted];
        rest /= 10;
        position += 1;
        if rest == 0 {
            break;
        }
    }

    check == 0
}

/// Returns the component kind of `id`, or `None` for an unknown partition.
pub fn partition(id: SctId) -> Option<Partition> {
    if id < MIN_SCTID {
        return None;
    }

    match (id / 10) % 100 {
        0 | 10 => Some(Partition::Concept),
        1 | 11 => Some(Partition::Description),
        2 | 12 => Some(Partition::Relationship),
        _ => None,
    }
}

/// Returns true if `id` is a well-formed concept identifier.
///
/// ```
/// use snomed_types::sctid::is_concept_id;
///
/// assert!(is_concept_id(116680003));
/// assert!(!is_concept_id(116680004)); // bad check digit
/// assert!(!is_concept_id(754786014)); // description partition
/// ```
pub fn is_concept_id(id: SctId) -> bool {
    (MIN_SCTID..=MAX_SCTID).contains(&id)
        && partition(id) == Some(Partition::Concept)
        && has_valid_check_digit(id)
}
