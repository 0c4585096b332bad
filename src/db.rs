pub mod store;
pub use store::InvoiceStore;
pub mod workspace_repo;
pub use workspace_repo::WorkspaceRepository;
pub mod invoice_repo;
pub use invoice_repo::InvoiceRepository;
pub mod postgres;
pub use postgres::PgInvoiceStore;
pub mod in_memory;
pub use in_memory::InMemoryInvoiceStore;
