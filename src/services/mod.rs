pub mod document_store;
pub mod metadata;
pub mod pipeline;
pub mod storage;
pub mod thumbnail_service;
