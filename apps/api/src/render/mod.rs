pub mod flow;
pub mod view;
