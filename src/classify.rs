//! Positional row classification and field-level editability.

use crate::model::{Field, Role};

pub const HEADER_INDEX: usize = 0;
pub const CONTRACT_META_INDEX: usize = 1;
pub const FIRST_ENTRY_INDEX: usize = 2;

/// Role a row plays by virtue of its position in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// Index 0: column labels, carries no financial data.
    Header,
    /// Index 1: only the contract-ceiling field is meaningful.
    ContractMeta,
    /// Index >= 2: a real expense record.
    Entry,
}

pub fn classify(index: usize) -> RowKind {
    match index {
        HEADER_INDEX => RowKind::Header,
        CONTRACT_META_INDEX => RowKind::ContractMeta,
        _ => RowKind::Entry,
    }
}

/// Whether `role` may edit `field` on the row at `index`.
///
/// The contract-ceiling field is editable only on the contract-metadata row;
/// every other field only on entry rows. Read-only roles edit nothing.
pub fn can_edit_field(index: usize, role: Role, field: Field) -> bool {
    if !role.can_edit() {
        return false;
    }
    match classify(index) {
        RowKind::Header => false,
        RowKind::ContractMeta => field == Field::ContractCeiling,
        RowKind::Entry => field != Field::ContractCeiling,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_positions() {
        assert_eq!(classify(0), RowKind::Header);
        assert_eq!(classify(1), RowKind::ContractMeta);
        assert_eq!(classify(2), RowKind::Entry);
        assert_eq!(classify(57), RowKind::Entry);
    }

    #[test]
    fn test_ceiling_editable_only_on_contract_meta_row() {
        assert!(can_edit_field(1, Role::Editor, Field::ContractCeiling));
        assert!(!can_edit_field(0, Role::Editor, Field::ContractCeiling));
        assert!(!can_edit_field(2, Role::Editor, Field::ContractCeiling));
    }

    #[test]
    fn test_entry_fields_editable_only_on_entry_rows() {
        assert!(can_edit_field(2, Role::Editor, Field::Expense));
        assert!(can_edit_field(9, Role::Editor, Field::Activity));
        assert!(!can_edit_field(1, Role::Editor, Field::Expense));
        assert!(!can_edit_field(0, Role::Editor, Field::Activity));
    }

    #[test]
    fn test_read_only_roles_edit_nothing() {
        for field in Field::ALL {
            for index in 0..4 {
                assert!(!can_edit_field(index, Role::Lector, field));
                assert!(!can_edit_field(index, Role::Invitado, field));
            }
        }
    }
}
