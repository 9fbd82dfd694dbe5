// ABOUTME: Defines EquipmentRecord, the six-field biomedical equipment entry, and its lookup keys.
// ABOUTME: Keys cover duplicate detection (name+serial), edit identity, and delete identity.

use serde::{Deserialize, Serialize};

/// A single piece of biomedical equipment. The name doubles as the identity
/// used by the selection and favorite sets.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipmentRecord {
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
    pub image: String,
    pub description: String,
}

impl EquipmentRecord {
    /// Build a record from its six fields.
    pub fn new(
        name: impl Into<String>,
        manufacturer: impl Into<String>,
        model: impl Into<String>,
        serial_number: impl Into<String>,
        image: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            manufacturer: manufacturer.into(),
            model: model.into(),
            serial_number: serial_number.into(),
            image: image.into(),
            description: description.into(),
        }
    }

    /// The record written to an empty store on first load.
    pub fn seed() -> Self {
        Self::new(
            "Infusion Pump",
            "Medtronic",
            "InfuStar 3000",
            "SN123456",
            "https://via.placeholder.com/150",
            "Volumetric infusion pump for hospital use.",
        )
    }

    /// Copy of this record with every field trimmed.
    pub fn trimmed(&self) -> Self {
        Self::new(
            self.name.trim(),
            self.manufacturer.trim(),
            self.model.trim(),
            self.serial_number.trim(),
            self.image.trim(),
            self.description.trim(),
        )
    }

    /// Names of the fields that are empty after trimming, in column order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("manufacturer", &self.manufacturer),
            ("model", &self.model),
            ("serial_number", &self.serial_number),
            ("image", &self.image),
            ("description", &self.description),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    pub fn duplicate_key(&self) -> DuplicateKey<'_> {
        DuplicateKey {
            name: &self.name,
            serial_number: &self.serial_number,
        }
    }

    /// Identity tuple used to locate this record when it is being edited.
    pub fn edit_key(&self) -> EditKey {
        EditKey {
            name: self.name.clone(),
            manufacturer: self.manufacturer.clone(),
            model: self.model.clone(),
            serial_number: self.serial_number.clone(),
        }
    }

    /// Identity tuple used to locate this record when it is being deleted.
    pub fn delete_key(&self) -> DeleteKey {
        DeleteKey {
            name: self.name.clone(),
            manufacturer: self.manufacturer.clone(),
            model: self.model.clone(),
        }
    }
}

/// Two records collide when both name and serial number are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateKey<'a> {
    pub name: &'a str,
    pub serial_number: &'a str,
}

/// Matches the original record being edited on (name, manufacturer, model, serial).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditKey {
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
}

impl EditKey {
    pub fn matches(&self, record: &EquipmentRecord) -> bool {
        record.name == self.name
            && record.manufacturer == self.manufacturer
            && record.model == self.model
            && record.serial_number == self.serial_number
    }
}

/// Matches a record to delete on (name, manufacturer, model). Serial is not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteKey {
    pub name: String,
    pub manufacturer: String,
    pub model: String,
}

impl DeleteKey {
    pub fn matches(&self, record: &EquipmentRecord) -> bool {
        record.name == self.name
            && record.manufacturer == self.manufacturer
            && record.model == self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_reports_blank_columns_in_order() {
        let record = EquipmentRecord::new("Monitor", "  ", "M1", "", "img.png", "desc");
        assert_eq!(record.missing_fields(), vec!["manufacturer", "serial_number"]);
        assert!(EquipmentRecord::seed().missing_fields().is_empty());
    }

    #[test]
    fn deserialize_fills_absent_fields_with_empty_strings() {
        let record: EquipmentRecord =
            serde_json::from_str(r#"{"name":"Ventilator","serial_number":"V-1"}"#).unwrap();
        assert_eq!(record.name, "Ventilator");
        assert_eq!(record.serial_number, "V-1");
        assert!(record.manufacturer.is_empty());
        assert!(record.description.is_empty());
    }

    #[test]
    fn delete_key_ignores_serial_but_edit_key_does_not() {
        let record = EquipmentRecord::new("ECG", "GE", "MAC 2000", "S-1", "x.png", "d");
        let mut other_serial = record.clone();
        other_serial.serial_number = "S-2".to_string();

        assert!(record.delete_key().matches(&other_serial));
        assert!(!record.edit_key().matches(&other_serial));
        assert!(record.edit_key().matches(&record));
    }
}
