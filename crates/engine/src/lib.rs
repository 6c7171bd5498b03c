pub use commands::{
    ContactNew, ContactUpdate, DocumentHeaderPatch, GroupNew, GroupUpdate, NewDocumentLine,
    PostDocumentCmd, StockItemNew, StockItemPatch,
};
pub use contacts::Contact;
pub use document_items::DocumentItem;
pub use documents::{Document, DocumentKind, DocumentStatus, StockDirection};
pub use error::EngineError;
pub use item_groups::ItemGroup;
pub use ops::{Engine, EngineBuilder, GroupScope};
pub use stock_items::StockItem;
pub use store_members::StoreRole;
pub use stores::Store;

mod commands;
mod contacts;
mod customers;
mod document_items;
mod documents;
mod error;
mod item_groups;
mod ops;
mod stock_items;
mod store_members;
mod stores;
mod suppliers;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
