mod filter;
pub use filter::Filter;

mod find;
pub use find::{Find, FindParams};

mod record;
pub use record::Record;

mod save;
pub use save::SaveOptions;

mod ty;
pub use ty::Type;

mod value;
pub use value::Value;
