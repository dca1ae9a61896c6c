use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Administrative-status literal that marks a row as paid. Matched
/// case-sensitively everywhere; `"pagado"` does not count.
pub const PAID_STATUS: &str = "Pagado";

/// Operational-status literals as they appear in the stored documents.
pub mod operational_status {
    pub const APPROVED: &str = "Aprobado";
    pub const SUPERVISED: &str = "Supervisado";
    pub const EXECUTED: &str = "Ejecutado";
}

/// The ten recognized text fields of a ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Activity,
    Description,
    Place,
    DateSpec,
    ContractCeiling,
    Expense,
    OperationalStatus,
    AdministrativeStatus,
    Receipt,
    Invoice,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::Activity,
        Field::Description,
        Field::Place,
        Field::DateSpec,
        Field::ContractCeiling,
        Field::Expense,
        Field::OperationalStatus,
        Field::AdministrativeStatus,
        Field::Receipt,
        Field::Invoice,
    ];

    /// Key of this field in the stored document.
    pub fn key(self) -> &'static str {
        match self {
            Field::Activity => "actividad",
            Field::Description => "descripcion",
            Field::Place => "lugar",
            Field::DateSpec => "fecha",
            Field::ContractCeiling => "os",
            Field::Expense => "egreso",
            Field::OperationalStatus => "estatus",
            Field::AdministrativeStatus => "estatus_adm",
            Field::Receipt => "hes",
            Field::Invoice => "factura",
        }
    }
}

fn default_visible() -> bool {
    true
}

/// A file attached to one entry row. Created on upload, destroyed on explicit
/// deletion or together with its owning row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Attachment {
    #[schemars(description = "Original filename as uploaded")]
    pub name: String,

    #[schemars(description = "Declared MIME type of the uploaded file")]
    pub mime_type: String,

    #[schemars(description = "Path of the blob inside the blob store")]
    pub path: String,

    #[schemars(description = "Retrievable URL returned by the blob store")]
    pub url: String,

    #[schemars(description = "File size in bytes")]
    pub size: u64,

    #[schemars(description = "Upload timestamp (UTC)")]
    pub uploaded_at: DateTime<Utc>,

    #[serde(default = "default_visible")]
    #[schemars(description = "Whether the attachment is shown to readers. Defaults to visible.")]
    pub visible: bool,
}

/// One row of the ledger. Every field is stored as text, exactly as a human
/// typed it; numeric and date semantics are recovered by parsing at
/// aggregation time, never stored typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LedgerRow {
    #[serde(rename = "actividad", default)]
    pub activity: String,

    #[serde(rename = "descripcion", default)]
    pub description: String,

    #[serde(rename = "lugar", default)]
    pub place: String,

    /// One or more dates, comma-separated, in `D/M/Y` or `YYYY-MM-DD` form.
    #[serde(rename = "fecha", default)]
    pub date_spec: String,

    /// Contract ceiling ("OS" amount). Only meaningful on row index 1.
    #[serde(rename = "os", default)]
    pub contract_ceiling: String,

    #[serde(rename = "egreso", default)]
    pub expense: String,

    #[serde(rename = "estatus", default)]
    pub operational_status: String,

    /// Free text; the literal "Pagado" marks the row as paid.
    #[serde(rename = "estatus_adm", default)]
    pub administrative_status: String,

    #[serde(rename = "hes", default)]
    pub receipt: String,

    #[serde(rename = "factura", default)]
    pub invoice: String,

    #[serde(rename = "recursos", default)]
    pub attachments: Vec<Attachment>,
}

impl LedgerRow {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Activity => &self.activity,
            Field::Description => &self.description,
            Field::Place => &self.place,
            Field::DateSpec => &self.date_spec,
            Field::ContractCeiling => &self.contract_ceiling,
            Field::Expense => &self.expense,
            Field::OperationalStatus => &self.operational_status,
            Field::AdministrativeStatus => &self.administrative_status,
            Field::Receipt => &self.receipt,
            Field::Invoice => &self.invoice,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Activity => self.activity = value,
            Field::Description => self.description = value,
            Field::Place => self.place = value,
            Field::DateSpec => self.date_spec = value,
            Field::ContractCeiling => self.contract_ceiling = value,
            Field::Expense => self.expense = value,
            Field::OperationalStatus => self.operational_status = value,
            Field::AdministrativeStatus => self.administrative_status = value,
            Field::Receipt => self.receipt = value,
            Field::Invoice => self.invoice = value,
        }
    }

    /// Blanks every text field. Attachments are not touched; they have their
    /// own deletion lifecycle through the blob store.
    pub fn clear_text_fields(&mut self) {
        for field in Field::ALL {
            self.set(field, "");
        }
    }
}

/// Ordered row set for one year.
///
/// Positional convention (not enforced by the data store): index 0 is a
/// header/label row, index 1 carries only the contract ceiling, indices >= 2
/// are real expense entries.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Ledger {
    pub year: String,

    #[serde(rename = "registros", default)]
    pub rows: Vec<LedgerRow>,
}

impl Ledger {
    pub fn new(year: impl Into<String>, rows: Vec<LedgerRow>) -> Self {
        Self {
            year: year.into(),
            rows,
        }
    }

    /// The contract-metadata row, when present.
    pub fn contract_meta(&self) -> Option<&LedgerRow> {
        self.rows.get(crate::classify::CONTRACT_META_INDEX)
    }

    /// Iterates over entry rows only, with their absolute indices.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &LedgerRow)> {
        self.rows
            .iter()
            .enumerate()
            .skip(crate::classify::FIRST_ENTRY_INDEX)
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(Ledger)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::generate_json_schema())
    }
}

/// Calendar month, named the way users select it in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Month {
    Enero,
    Febrero,
    Marzo,
    Abril,
    Mayo,
    Junio,
    Julio,
    Agosto,
    Septiembre,
    Octubre,
    Noviembre,
    Diciembre,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Enero,
        Month::Febrero,
        Month::Marzo,
        Month::Abril,
        Month::Mayo,
        Month::Junio,
        Month::Julio,
        Month::Agosto,
        Month::Septiembre,
        Month::Octubre,
        Month::Noviembre,
        Month::Diciembre,
    ];

    /// 1-based calendar month number.
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    pub fn name(self) -> &'static str {
        match self {
            Month::Enero => "Enero",
            Month::Febrero => "Febrero",
            Month::Marzo => "Marzo",
            Month::Abril => "Abril",
            Month::Mayo => "Mayo",
            Month::Junio => "Junio",
            Month::Julio => "Julio",
            Month::Agosto => "Agosto",
            Month::Septiembre => "Septiembre",
            Month::Octubre => "Octubre",
            Month::Noviembre => "Noviembre",
            Month::Diciembre => "Diciembre",
        }
    }

    /// Case-insensitive lookup, matching how the month selector passes names.
    pub fn from_name(name: &str) -> Option<Month> {
        let lowered = name.trim().to_lowercase();
        Month::ALL
            .into_iter()
            .find(|m| m.name().to_lowercase() == lowered)
    }
}

/// Caller role as resolved from the roles collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full editing rights.
    Editor,
    /// Read-only, sees every aggregated view.
    Lector,
    /// Read-only, restricted field set, no contract-state or comparison views.
    Invitado,
}

impl Role {
    /// Maps a stored role string to a role. Anything unrecognized is `None`
    /// and must force the session out.
    pub fn from_name(name: &str) -> Option<Role> {
        match name {
            "editor" => Some(Role::Editor),
            "lector" => Some(Role::Lector),
            "invitado" => Some(Role::Invitado),
            _ => None,
        }
    }

    pub fn can_edit(self) -> bool {
        matches!(self, Role::Editor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_deserializes_from_document_keys() {
        let json = r#"{
            "actividad": "Mantenimiento",
            "descripcion": "Cambio de filtros",
            "lugar": "Planta Norte",
            "fecha": "5/3/2024",
            "os": "",
            "egreso": "$1500.00",
            "estatus": "Ejecutado",
            "hes": "HES-031",
            "factura": "F-1002"
        }"#;

        let row: LedgerRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.activity, "Mantenimiento");
        assert_eq!(row.expense, "$1500.00");
        // Fields absent from the document default to empty.
        assert_eq!(row.administrative_status, "");
        assert!(row.attachments.is_empty());
    }

    #[test]
    fn test_row_field_accessors_cover_every_field() {
        let mut row = LedgerRow::blank();
        for field in Field::ALL {
            row.set(field, field.key());
        }
        for field in Field::ALL {
            assert_eq!(row.get(field), field.key());
        }

        row.clear_text_fields();
        for field in Field::ALL {
            assert_eq!(row.get(field), "");
        }
    }

    #[test]
    fn test_attachment_visibility_defaults_to_visible() {
        let json = r#"{
            "name": "factura.pdf",
            "mime_type": "application/pdf",
            "path": "attachments/2024/2/1700000000000_factura.pdf",
            "url": "https://blobs.example/factura.pdf",
            "size": 1024,
            "uploaded_at": "2024-03-05T12:00:00Z"
        }"#;

        let attachment: Attachment = serde_json::from_str(json).unwrap();
        assert!(attachment.visible);
    }

    #[test]
    fn test_document_schema_generation() {
        let schema_json = Ledger::schema_as_json().unwrap();
        assert!(schema_json.contains("registros"));
        assert!(schema_json.contains("egreso"));
        assert!(schema_json.contains("recursos"));
    }

    #[test]
    fn test_month_from_name_is_case_insensitive() {
        assert_eq!(Month::from_name("marzo"), Some(Month::Marzo));
        assert_eq!(Month::from_name("MARZO"), Some(Month::Marzo));
        assert_eq!(Month::from_name(" Diciembre "), Some(Month::Diciembre));
        assert_eq!(Month::from_name("brumaire"), None);
        assert_eq!(Month::Enero.number(), 1);
        assert_eq!(Month::Diciembre.number(), 12);
    }

    #[test]
    fn test_role_from_name_rejects_unknown_roles() {
        assert_eq!(Role::from_name("editor"), Some(Role::Editor));
        assert_eq!(Role::from_name("lector"), Some(Role::Lector));
        assert_eq!(Role::from_name("invitado"), Some(Role::Invitado));
        assert_eq!(Role::from_name("admin"), None);
        assert!(!Role::Lector.can_edit());
    }
}
