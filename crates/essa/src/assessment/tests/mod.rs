mod common;
mod document;
mod routing;
