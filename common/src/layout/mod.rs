pub mod grid;
pub mod indices;
pub mod instance;
pub mod routers;
