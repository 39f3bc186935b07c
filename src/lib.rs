mod attribute_value;
mod context;
mod context_builder;
mod decision;
mod registry;
mod schema;
mod table;
mod test_common;
mod util;

pub use attribute_value::*;
pub use context::*;
pub use context_builder::*;
pub use decision::*;
pub use registry::*;
pub use schema::*;
pub use table::*;
