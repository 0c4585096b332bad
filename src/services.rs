pub mod auth;
pub mod workspace_service;
pub mod invoice_service;
pub mod invoice_view;
pub mod duplicates;
pub mod stats_service;
pub mod csv_service;
pub mod document_service;
pub mod extraction_service;
pub mod import_service;
