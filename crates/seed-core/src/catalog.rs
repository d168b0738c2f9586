//! The fixed catalog of seeded tables.
//!
//! Column names, types and nullability here are the persisted layout that
//! downstream consumers read; they must not drift.

use crate::schema::{ColumnDefinition, TableDefinition};
use crate::types::SqlType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a table is prepared before it is populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetMode {
    /// `DROP TABLE` if it exists, then `CREATE TABLE`.
    DropAndCreate,
    /// `CREATE TABLE` only if missing, then `TRUNCATE TABLE`.
    CreateIfMissingThenTruncate,
}

/// A table this tool knows how to seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedTable {
    /// `TB_ESTR_CONTAS`
    Accounts,
    /// `TB_ESTR_ATIVO`
    Activity,
    /// `TB_ESTR_LOJAS`
    Stores,
    /// `MUNICIPIOS_PRIORITARIOS`
    Municipalities,
    /// `MUNICIPIOS_PRIORITARIOS_TRATATIVAS`
    Treatments,
    /// `OPORTUNIDADES_CONTAS`
    Opportunities,
    /// `HOTLIST`
    Hotlist,
}

impl SeedTable {
    /// Every table, in the order that satisfies their reference reads.
    pub const ALL: [SeedTable; 7] = [
        SeedTable::Accounts,
        SeedTable::Activity,
        SeedTable::Stores,
        SeedTable::Municipalities,
        SeedTable::Treatments,
        SeedTable::Opportunities,
        SeedTable::Hotlist,
    ];

    /// Persisted table name.
    pub fn table_name(&self) -> &'static str {
        match self {
            Self::Accounts => "TB_ESTR_CONTAS",
            Self::Activity => "TB_ESTR_ATIVO",
            Self::Stores => "TB_ESTR_LOJAS",
            Self::Municipalities => "MUNICIPIOS_PRIORITARIOS",
            Self::Treatments => "MUNICIPIOS_PRIORITARIOS_TRATATIVAS",
            Self::Opportunities => "OPORTUNIDADES_CONTAS",
            Self::Hotlist => "HOTLIST",
        }
    }

    /// Stable small integer used to derive a per-table RNG stream.
    pub fn ordinal(&self) -> u64 {
        match self {
            Self::Accounts => 1,
            Self::Activity => 2,
            Self::Stores => 3,
            Self::Municipalities => 4,
            Self::Treatments => 5,
            Self::Opportunities => 6,
            Self::Hotlist => 7,
        }
    }

    /// How the table is reset before a run.
    pub fn reset_mode(&self) -> ResetMode {
        match self {
            Self::Accounts | Self::Activity | Self::Stores => ResetMode::DropAndCreate,
            Self::Municipalities | Self::Treatments | Self::Opportunities | Self::Hotlist => {
                ResetMode::CreateIfMissingThenTruncate
            }
        }
    }

    /// Default row count when the run does not override it.
    ///
    /// `None` means the count is taken from a reference table.
    pub fn default_row_count(&self) -> Option<u64> {
        match self {
            Self::Accounts => Some(2500),
            Self::Activity | Self::Stores => None,
            Self::Municipalities | Self::Treatments | Self::Opportunities | Self::Hotlist => {
                Some(20)
            }
        }
    }

    /// Tables whose rows this table's generation reads.
    pub fn reads_from(&self) -> &'static [SeedTable] {
        match self {
            Self::Activity | Self::Stores => &[SeedTable::Accounts],
            Self::Treatments => &[SeedTable::Municipalities],
            Self::Opportunities => &[SeedTable::Stores],
            Self::Accounts | Self::Municipalities | Self::Hotlist => &[],
        }
    }

    /// This table preceded by everything it transitively reads, in load order.
    pub fn with_prerequisites(&self) -> Vec<SeedTable> {
        let mut needed = vec![*self];
        let mut i = 0;
        while i < needed.len() {
            for dep in needed[i].reads_from() {
                if !needed.contains(dep) {
                    needed.push(*dep);
                }
            }
            i += 1;
        }
        Self::ALL
            .into_iter()
            .filter(|t| needed.contains(t))
            .collect()
    }

    /// Column layout.
    pub fn definition(&self) -> TableDefinition {
        match self {
            Self::Accounts => monthly_table("TB_ESTR_CONTAS", "DT_ULT_AB_CONTA"),
            Self::Activity => monthly_table("TB_ESTR_ATIVO", "DT_ULT_TRANSACAO"),
            Self::Stores => stores(),
            Self::Municipalities => municipalities(),
            Self::Treatments => treatments(),
            Self::Opportunities => opportunities(),
            Self::Hotlist => hotlist(),
        }
    }
}

impl fmt::Display for SeedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

const fn varchar(length: u32) -> SqlType {
    SqlType::VarChar { length }
}

const fn nvarchar(length: u32) -> SqlType {
    SqlType::NVarChar {
        length: Some(length),
    }
}

fn opt(name: &str, column_type: SqlType) -> ColumnDefinition {
    ColumnDefinition::nullable(name, column_type)
}

fn monthly_table(name: &str, date_column: &str) -> TableDefinition {
    TableDefinition::new(
        name,
        vec![
            ColumnDefinition::primary_key("CHAVE_LOJA", SqlType::Int),
            opt(date_column, SqlType::Date),
            opt("MES_M3", SqlType::Int),
            opt("MES_M2", SqlType::Int),
            opt("MES_M1", SqlType::Int),
            opt("MES_M0", SqlType::Int),
        ],
    )
}

fn stores() -> TableDefinition {
    let money = SqlType::Decimal {
        precision: 15,
        scale: 2,
    };
    TableDefinition::new(
        "TB_ESTR_LOJAS",
        vec![
            ColumnDefinition::primary_key("CHAVE_LOJA", SqlType::Int),
            opt("CNPJ", varchar(18)),
            opt("NOME_LOJA", varchar(255)),
            opt("DESC_SEGTO", varchar(50)),
            opt("COD_AG_RELACIONAMENTO", SqlType::Int),
            opt("NR_PACB", SqlType::Int),
            opt("AG_RELACIONAMENTO", varchar(255)),
            opt("CHAVE_PAA", SqlType::Int),
            opt("NOME_PAA", varchar(255)),
            opt("DT_ENVIO_VAN", SqlType::Date),
            opt("DT_INAUGURACAO", SqlType::Date),
            opt("DT_INAUGURACAO_BACEN", SqlType::Date),
            opt("DT_ENCERRAMENTO_BACEN", SqlType::Date),
            opt("MOTIVO_ENCERRAMENTO", varchar(255)),
            opt("DT_RETIRADA_EQTO", SqlType::Date),
            opt("STATUS_TABLET", varchar(50)),
            opt("DT_IMPLANTACAO_TABLET", SqlType::Date),
            opt("DT_RETIRADA_TABLET", SqlType::Date),
            opt("GTE_RESP_LOJA", varchar(255)),
            opt("TELEFONE_PADRAO", varchar(20)),
            opt("DT_BLOQUEIO", SqlType::Date),
            opt("MOTIVO_BLOQUEIO", varchar(255)),
            opt("TIPO_POSTO", varchar(50)),
            opt("BE_AVANCADO", SqlType::Bit),
            opt("BE_ORG_PAGADOR", SqlType::Bit),
            opt("BE_PLATAFORMA", SqlType::Bit),
            opt("ENDERECO", varchar(500)),
            opt("COD_IBGE", SqlType::Int),
            opt("MUNICIPIO", varchar(255)),
            opt("UF", SqlType::Char { length: 2 }),
            opt("QUADRANTE", varchar(50)),
            opt("COD_MULT", SqlType::Int),
            opt("MULTIPLICADOR", varchar(255)),
            opt("DIRE_REG", SqlType::Int),
            opt("DIR_REGIONAL", varchar(255)),
            opt("COD_GER_REG", SqlType::Int),
            opt("GER_REGIONAL", varchar(255)),
            opt("CHAVE_GERENCIA_AREA", SqlType::Int),
            opt("DESC_GERENCIA_AREA", varchar(255)),
            opt("CHAVE_COORDENACAO", SqlType::Int),
            opt("DESC_COORDENACAO", varchar(255)),
            opt("CHAVE_SUPERVISAO", SqlType::Int),
            opt("DESC_SUPERVISAO", varchar(255)),
            opt("COD_ILHA", SqlType::Int),
            opt("DESC_ILHA", varchar(255)),
            opt("NOME_ILHA", varchar(255)),
            opt("CHAVE_GERENCIA_NEGOCIO", SqlType::Int),
            opt("DESC_GERENCIA_NEGOCIO", varchar(255)),
            opt("SITUACAO", varchar(50)),
            opt("DT_ULT_TRANSACAO", SqlType::Date),
            opt("HABILITADO_CONTA", SqlType::Bit),
            opt("HABILITADO_MICRO", SqlType::Bit),
            opt("HABILITADO_LIME", SqlType::Bit),
            opt("HABILITADO_CONSIG", SqlType::Bit),
            opt("SALDO_CX", money),
            opt("LIMITE", money),
        ],
    )
}

fn municipalities() -> TableDefinition {
    TableDefinition::new(
        "MUNICIPIOS_PRIORITARIOS",
        vec![
            ColumnDefinition::primary_key("CD_MUNIC", SqlType::Int),
            ColumnDefinition::new("MUNICIPIO", nvarchar(100)),
            ColumnDefinition::new("UF", SqlType::Char { length: 2 }),
            ColumnDefinition::new("CHAVE_SUP", SqlType::Int),
            ColumnDefinition::new("CHAVE_COORD", SqlType::Int),
            ColumnDefinition::new("CHAVE_GERENTE", SqlType::Int),
        ],
    )
}

fn treatments() -> TableDefinition {
    TableDefinition::new(
        "MUNICIPIOS_PRIORITARIOS_TRATATIVAS",
        vec![
            ColumnDefinition::primary_key("ID_TRATATIVA", SqlType::UniqueIdentifier)
                .with_default("NEWID()"),
            opt("USER_ID", SqlType::UniqueIdentifier),
            opt("USER", nvarchar(100)),
            ColumnDefinition::new("CD_MUNIC", SqlType::Int),
            opt("DATA_TRATATIVA", SqlType::DateTime),
            opt("DATA_VISITA", SqlType::DateTime),
            opt("CNPJ", SqlType::Char { length: 14 }),
            opt("SEM_CNPJ", SqlType::Bit),
            opt("NOME_LOJA", nvarchar(200)),
            opt("RAMO_ATIVIDADE_REFERENCIA", nvarchar(3)),
            opt("HOUVE_INTERESSE", nvarchar(3)),
            opt("CONTRATO_ENVIADO", nvarchar(3)),
            opt("OBSERVACAO", SqlType::NVarChar { length: None }),
        ],
    )
}

fn opportunities() -> TableDefinition {
    TableDefinition::new(
        "OPORTUNIDADES_CONTAS",
        vec![
            ColumnDefinition::primary_key("ID", SqlType::UniqueIdentifier),
            opt("COD_DR", varchar(2)),
            opt("DIR_REGIONAL", nvarchar(100)),
            opt("COD_GR", varchar(10)),
            opt("GER_REGIONAL", nvarchar(100)),
            opt("LOCALIZACAO", nvarchar(255)),
            opt("CONTATO", nvarchar(100)),
            opt("TELEFONE", varchar(30)),
            opt("DATA_CERTIFICACAO", SqlType::Date),
            opt("STATUS_TABLET", varchar(20)),
            opt("HABILITADO_CONSIGNADO", SqlType::Bit),
            opt("HABILITADO_LIME", SqlType::Bit),
            opt("HABILITADO_MICROSSEGURO", SqlType::Bit),
            opt("COD_AG", varchar(10)),
            opt("NOME_AGENCIA", nvarchar(100)),
            opt("CHAVE_PAA", varchar(10)),
            opt("NOME_PAA", nvarchar(100)),
            opt("SITUACAO", varchar(50)),
            opt("ULT_TRX_CONTABIL", SqlType::Date),
            opt("ULT_TRX_NEGOCIO", SqlType::Date),
            opt("TENDENCIA", varchar(20)),
            opt("CHAVE_LOJA", varchar(20)),
            opt("CNPJ", varchar(18)),
            opt("NOME_LOJA", nvarchar(100)),
            opt("MES_M3", SqlType::Int),
            opt("MES_M2", SqlType::Int),
            opt("MES_M1", SqlType::Int),
            opt("MES_M0", SqlType::Int),
            opt("DATA_BLOQUEIO", SqlType::Date),
            opt("MOTIVO_BLOQUEIO", nvarchar(255)),
            opt("DATA_INAUGURACAO", SqlType::Date),
            opt("CREATED_AT", SqlType::DateTime),
            opt("UPDATED_AT", SqlType::DateTime),
            opt("USER_ID", SqlType::UniqueIdentifier),
            opt("MULTIPLICADOR_RESPONSAVEL", nvarchar(100)),
            opt("NOME_PDV", nvarchar(100)),
            opt("TIPO_ESTRATEGIA", varchar(50)),
        ],
    )
}

fn hotlist() -> TableDefinition {
    TableDefinition::new(
        "HOTLIST",
        vec![
            ColumnDefinition::primary_key("id", SqlType::UniqueIdentifier),
            opt("supervisor_id", SqlType::UniqueIdentifier),
            opt("CNPJ", varchar(18)),
            opt("NOME_LOJA", nvarchar(200)),
            opt("LOCALIZACAO", nvarchar(200)),
            opt("AGENCIA", varchar(10)),
            opt("MERCADO", nvarchar(50)),
            opt("PRACA_PRESENCA", varchar(3)),
            opt("situacao", varchar(20)),
            opt("DIRETORIA_REGIONAL", nvarchar(100)),
            opt("GERENCIA_REGIONAL", nvarchar(100)),
            opt("PA", varchar(10)),
            opt("GERENTE_PJ", nvarchar(100)),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_counts() {
        assert_eq!(SeedTable::Accounts.definition().columns.len(), 6);
        assert_eq!(SeedTable::Activity.definition().columns.len(), 6);
        assert_eq!(SeedTable::Stores.definition().columns.len(), 56);
        assert_eq!(SeedTable::Municipalities.definition().columns.len(), 6);
        assert_eq!(SeedTable::Treatments.definition().columns.len(), 13);
        assert_eq!(SeedTable::Opportunities.definition().columns.len(), 37);
        assert_eq!(SeedTable::Hotlist.definition().columns.len(), 13);
    }

    #[test]
    fn test_definition_names_match_table_names() {
        for table in SeedTable::ALL {
            assert_eq!(table.definition().name, table.table_name());
        }
    }

    #[test]
    fn test_treatment_id_is_server_generated() {
        let def = SeedTable::Treatments.definition();
        assert_eq!(def.insert_columns().count(), 12);
        assert_eq!(def.insert_column_names()[0], "USER_ID");
    }

    #[test]
    fn test_prerequisites_in_load_order() {
        assert_eq!(
            SeedTable::Opportunities.with_prerequisites(),
            vec![SeedTable::Accounts, SeedTable::Stores, SeedTable::Opportunities]
        );
        assert_eq!(
            SeedTable::Treatments.with_prerequisites(),
            vec![SeedTable::Municipalities, SeedTable::Treatments]
        );
        assert_eq!(SeedTable::Hotlist.with_prerequisites(), vec![SeedTable::Hotlist]);
    }

    #[test]
    fn test_ordinals_are_unique() {
        let mut ordinals: Vec<u64> = SeedTable::ALL.iter().map(|t| t.ordinal()).collect();
        ordinals.dedup();
        assert_eq!(ordinals.len(), SeedTable::ALL.len());
    }
}
