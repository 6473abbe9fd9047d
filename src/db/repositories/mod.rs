mod history;
mod images;
mod kv;
