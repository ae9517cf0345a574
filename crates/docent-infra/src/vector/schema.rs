//! Arrow schema for the LanceDB passage table.
//!
//! Each row is one embedded handbook passage with a 384-dimensional
//! float32 vector for all-MiniLM-L6-v2 embeddings.
//!
//! Arrow versions MUST match lancedb's transitive dependency (57.3 for
//! lancedb 0.26).

use std::sync::Arc;

use arrow_schema::{DataType, Field, Schema};

/// all-MiniLM-L6-v2 embedding dimension.
pub const EMBEDDING_DIMENSION: i32 = 384;

/// Schema for the `handbook_passages` table in LanceDB.
pub fn passage_schema() -> Schema {
    Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("source", DataType::Utf8, false),
        Field::new("section", DataType::Utf8, false),
        Field::new("chunk_index", DataType::Int32, false),
        Field::new("text", DataType::Utf8, false),
        Field::new(
            "vector",
            DataType::FixedSizeList(
                Arc::new(Field::new("item", DataType::Float32, true)),
                EMBEDDING_DIMENSION,
            ),
            false,
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passage_schema_has_correct_fields() {
        let schema = passage_schema();
        assert_eq!(schema.fields().len(), 6);
        assert!(schema.field_with_name("id").is_ok());
        assert!(schema.field_with_name("source").is_ok());
        assert!(schema.field_with_name("section").is_ok());
        assert!(schema.field_with_name("text").is_ok());
        assert!(schema.field_with_name("vector").is_ok());

        let vector_field = schema.field_with_name("vector").unwrap();
        match vector_field.data_type() {
            DataType::FixedSizeList(_, size) => assert_eq!(*size, EMBEDDING_DIMENSION),
            other => panic!("Expected FixedSizeList, got {:?}", other),
        }
    }

    #[test]
    fn test_embedding_dimension_constant() {
        assert_eq!(EMBEDDING_DIMENSION, 384);
    }
}
