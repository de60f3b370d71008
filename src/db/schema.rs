/// Every table is a key-value pair: the record's primary key plus the full
/// record as a JSON document. Writes replace the document wholesale.
pub fn kv_table_ddl(table: &str, key_column: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {table} (\n    {key_column} TEXT PRIMARY KEY,\n    doc TEXT NOT NULL\n);\n"
    )
}

pub fn upsert_sql(table: &str, key_column: &str) -> String {
    format!(
        "INSERT INTO {table} ({key_column}, doc) VALUES (?1, ?2) \
         ON CONFLICT({key_column}) DO UPDATE SET doc = excluded.doc"
    )
}

pub fn get_sql(table: &str, key_column: &str) -> String {
    format!("SELECT doc FROM {table} WHERE {key_column} = ?1")
}

pub fn scan_sql(table: &str) -> String {
    format!("SELECT doc FROM {table}")
}
