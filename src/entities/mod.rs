pub mod image_documents;
