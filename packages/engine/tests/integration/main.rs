mod common;

mod models;
