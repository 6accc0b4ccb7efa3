pub mod contacts;
pub mod content;
pub mod uploads;

pub use contacts::ContactStore;
pub use content::ContentStore;
pub use uploads::UploadStore;
