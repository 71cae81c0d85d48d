// Text measurement for the report view: static Helvetica metrics and greedy wrap.

pub mod font_metrics;
pub mod wrap;
