use crate::models::{CollectionSchema, FieldType};
use crate::TabularDataset;

/// Derives a collection schema from a dataset: every column becomes an
/// analyzed text field. Forfeiting numeric/date typing keeps re-runs
/// predictable regardless of what the first uploaded file looked like.
pub fn infer_schema(dataset: &TabularDataset) -> CollectionSchema {
    CollectionSchema {
        fields: dataset
            .columns
            .iter()
            .map(|column| (column.clone(), FieldType::Text))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::infer_schema;
    use crate::models::FieldType;
    use crate::TabularDataset;

    #[test]
    fn every_column_maps_to_text_in_order() {
        let dataset = TabularDataset {
            columns: vec!["text".to_string(), "year".to_string(), "ok".to_string()],
            rows: Vec::new(),
        };

        let schema = infer_schema(&dataset);
        let names: Vec<&str> = schema.fields.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["text", "year", "ok"]);
        assert!(schema
            .fields
            .iter()
            .all(|(_, field_type)| *field_type == FieldType::Text));
    }

    #[test]
    fn empty_dataset_yields_empty_schema() {
        let dataset = TabularDataset {
            columns: Vec::new(),
            rows: Vec::new(),
        };
        assert!(infer_schema(&dataset).fields.is_empty());
    }
}
