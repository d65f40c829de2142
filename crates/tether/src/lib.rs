pub mod db;
pub use db::Db;

mod relation;

mod row;
pub use row::Row;

mod transaction;
pub use transaction::Transaction;

pub use tether_core::{
    bail, err,
    schema::{
        Attribute, BelongsTo, BelongsToOptions, Model, ModelDef, ModelId, ModelOptions,
        ReferentialAction,
    },
    stmt::{Filter, Find, FindParams, Record, SaveOptions, Type, Value},
    Error, Result,
};

pub use tether_core::{
    driver::{self, TxId},
    schema, stmt,
};
