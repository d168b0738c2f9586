//! SQL Server statement text for the seeded tables.
//!
//! Identifiers are always bracket-quoted so reserved words such as `USER`
//! survive as column names.

use crate::schema::TableDefinition;

/// SQL Server DDL/DML generator.
pub struct SqlServerDdl;

impl SqlServerDdl {
    /// Bracket-quote an identifier.
    pub fn quote_ident(name: &str) -> String {
        format!("[{}]", name.replace(']', "]]"))
    }

    /// Generate a `CREATE TABLE` statement.
    pub fn create_table(&self, table: &TableDefinition) -> String {
        let column_defs: Vec<String> = table
            .columns
            .iter()
            .map(|column| {
                let mut def = format!(
                    "  {} {} {}",
                    Self::quote_ident(&column.name),
                    column.column_type,
                    if column.nullable { "NULL" } else { "NOT NULL" }
                );
                if let Some(expr) = &column.default_expr {
                    def.push_str(&format!(" DEFAULT {expr}"));
                }
                if column.primary_key {
                    def.push_str(" PRIMARY KEY");
                }
                def
            })
            .collect();

        format!(
            "CREATE TABLE {} (\n{}\n);",
            Self::quote_ident(&table.name),
            column_defs.join(",\n")
        )
    }

    /// Generate a statement that creates the table only when it is missing.
    pub fn create_table_if_missing(&self, table: &TableDefinition) -> String {
        format!(
            "IF OBJECT_ID('{}', 'U') IS NULL\nBEGIN\n{}\nEND;",
            table.name,
            self.create_table(table)
        )
    }

    /// Generate a conditional `DROP TABLE` statement.
    pub fn drop_table_if_exists(&self, table_name: &str) -> String {
        format!(
            "IF OBJECT_ID('{table_name}', 'U') IS NOT NULL DROP TABLE {};",
            Self::quote_ident(table_name)
        )
    }

    /// Generate a `TRUNCATE TABLE` statement.
    pub fn truncate_table(&self, table_name: &str) -> String {
        format!("TRUNCATE TABLE {};", Self::quote_ident(table_name))
    }

    /// Generate a parameterized single-row `INSERT` over the insertable columns.
    pub fn insert_statement(&self, table: &TableDefinition) -> String {
        let columns = table.insert_column_names();
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("@P{i}")).collect();

        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            Self::quote_ident(&table.name),
            columns
                .iter()
                .map(|c| Self::quote_ident(c))
                .collect::<Vec<_>>()
                .join(", "),
            placeholders.join(", ")
        )
    }

    /// Generate a multi-row parameterized `INSERT` for `row_count` rows.
    pub fn insert_many_statement(&self, table: &TableDefinition, row_count: usize) -> String {
        let columns = table.insert_column_names();
        let col_count = columns.len();
        let mut param_idx = 1;
        let mut rows: Vec<String> = Vec::with_capacity(row_count);

        for _ in 0..row_count {
            let row_placeholders: Vec<String> = (0..col_count)
                .map(|_| {
                    let p = format!("@P{param_idx}");
                    param_idx += 1;
                    p
                })
                .collect();
            rows.push(format!("({})", row_placeholders.join(", ")));
        }

        format!(
            "INSERT INTO {} ({}) VALUES {}",
            Self::quote_ident(&table.name),
            columns
                .iter()
                .map(|c| Self::quote_ident(c))
                .collect::<Vec<_>>()
                .join(", "),
            rows.join(", ")
        )
    }

    /// Generate a `SELECT` of the given columns.
    pub fn select_columns(&self, table_name: &str, columns: &[&str], distinct: bool) -> String {
        format!(
            "SELECT {}{} FROM {}",
            if distinct { "DISTINCT " } else { "" },
            columns
                .iter()
                .map(|c| Self::quote_ident(c))
                .collect::<Vec<_>>()
                .join(", "),
            Self::quote_ident(table_name)
        )
    }

    /// Generate a `SELECT COUNT(*)` statement.
    pub fn count_rows(&self, table_name: &str) -> String {
        format!("SELECT COUNT(*) FROM {}", Self::quote_ident(table_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SeedTable;

    #[test]
    fn test_create_table_accounts() {
        let sql = SqlServerDdl.create_table(&SeedTable::Accounts.definition());
        assert!(sql.starts_with("CREATE TABLE [TB_ESTR_CONTAS] ("));
        assert!(sql.contains("[CHAVE_LOJA] INT NOT NULL PRIMARY KEY"));
        assert!(sql.contains("[DT_ULT_AB_CONTA] DATE NULL"));
        assert!(sql.contains("[MES_M0] INT NULL"));
    }

    #[test]
    fn test_create_table_treatments() {
        let sql = SqlServerDdl.create_table(&SeedTable::Treatments.definition());
        assert!(sql.contains("[ID_TRATATIVA] UNIQUEIDENTIFIER NOT NULL DEFAULT NEWID() PRIMARY KEY"));
        assert!(sql.contains("[USER] NVARCHAR(100) NULL"));
        assert!(sql.contains("[CNPJ] CHAR(14) NULL"));
        assert!(sql.contains("[OBSERVACAO] NVARCHAR(MAX) NULL"));
    }

    #[test]
    fn test_create_table_stores_money_columns() {
        let sql = SqlServerDdl.create_table(&SeedTable::Stores.definition());
        assert!(sql.contains("[SALDO_CX] DECIMAL(15,2) NULL"));
        assert!(sql.contains("[LIMITE] DECIMAL(15,2) NULL"));
        assert!(sql.contains("[UF] CHAR(2) NULL"));
    }

    #[test]
    fn test_drop_and_truncate() {
        assert_eq!(
            SqlServerDdl.drop_table_if_exists("TB_ESTR_LOJAS"),
            "IF OBJECT_ID('TB_ESTR_LOJAS', 'U') IS NOT NULL DROP TABLE [TB_ESTR_LOJAS];"
        );
        assert_eq!(
            SqlServerDdl.truncate_table("HOTLIST"),
            "TRUNCATE TABLE [HOTLIST];"
        );
    }

    #[test]
    fn test_create_if_missing_wraps_create() {
        let sql = SqlServerDdl.create_table_if_missing(&SeedTable::Municipalities.definition());
        assert!(sql.starts_with("IF OBJECT_ID('MUNICIPIOS_PRIORITARIOS', 'U') IS NULL"));
        assert!(sql.contains("[MUNICIPIO] NVARCHAR(100) NOT NULL"));
        assert!(sql.ends_with("END;"));
    }

    #[test]
    fn test_insert_statement_skips_default_columns() {
        let sql = SqlServerDdl.insert_statement(&SeedTable::Treatments.definition());
        assert!(!sql.contains("ID_TRATATIVA"));
        assert!(sql.contains("([USER_ID], [USER], [CD_MUNIC]"));
        assert!(sql.ends_with("@P12)"));
    }

    #[test]
    fn test_insert_many_statement_numbers_params() {
        let sql = SqlServerDdl.insert_many_statement(&SeedTable::Accounts.definition(), 2);
        assert!(sql.ends_with("VALUES (@P1, @P2, @P3, @P4, @P5, @P6), (@P7, @P8, @P9, @P10, @P11, @P12)"));
    }

    #[test]
    fn test_select_columns() {
        assert_eq!(
            SqlServerDdl.select_columns("T", &["A", "B"], true),
            "SELECT DISTINCT [A], [B] FROM [T]"
        );
        assert_eq!(SqlServerDdl.count_rows("T"), "SELECT COUNT(*) FROM [T]");
    }

    #[test]
    fn test_quote_ident_escapes_bracket() {
        assert_eq!(SqlServerDdl::quote_ident("a]b"), "[a]]b]");
    }
}
