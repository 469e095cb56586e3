mod blueprint;
mod common;
