//! `OPORTUNIDADES_CONTAS`: account-opening opportunities.

use super::{Fixture, MonthlyVolumes};
use crate::generators::document::cnpj_formatted;
use crate::generators::temporal::{
    date_between_lookbacks, date_within, reference_timestamp, Lookback,
};
use crate::generators::text;
use crate::generators::uuid::random_uuid;
use crate::FixtureRng;
use chrono::{NaiveDate, NaiveDateTime};
use seed_core::{SeedTable, SeedValue};
use serde::Serialize;
use uuid::Uuid;

/// The closed set of users opportunities are assigned to.
pub const OPPORTUNITY_USERS: [Uuid; 2] = [
    Uuid::from_u128(0x8ABD1646_FEC3_4AD3_B130_5D4A961365DB),
    Uuid::from_u128(0x13651188_7289_4C4B_A509_1A2AD65B486F),
];

/// Strategy tag written on every opportunity.
pub const STRATEGY: &str = "abertura-conta";

const TABLET_STATUSES: [&str; 3] = ["Instalado", "Retirado", "S.Tablet"];
const SITUATIONS: [&str; 3] = ["ativa", "bloqueada", "em processo de encerramento"];
const TRENDS: [&str; 4] = ["queda", "atencao", "estavel", "comecando"];

/// One `OPORTUNIDADES_CONTAS` row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct OpportunityRecord {
    pub id: Uuid,
    pub cod_dr: String,
    pub dir_regional: String,
    pub cod_gr: String,
    pub ger_regional: String,
    pub localizacao: String,
    pub contato: String,
    pub telefone: String,
    pub data_certificacao: NaiveDate,
    pub status_tablet: String,
    pub habilitado_consignado: bool,
    pub habilitado_lime: bool,
    pub habilitado_microsseguro: bool,
    pub cod_ag: String,
    pub nome_agencia: String,
    pub chave_paa: String,
    pub nome_paa: String,
    pub situacao: String,
    pub ult_trx_contabil: NaiveDate,
    pub ult_trx_negocio: NaiveDate,
    pub tendencia: String,
    pub chave_loja: String,
    pub cnpj: String,
    pub nome_loja: String,
    #[serde(flatten)]
    pub volumes: MonthlyVolumes,
    pub data_bloqueio: Option<NaiveDate>,
    pub motivo_bloqueio: Option<String>,
    pub data_inauguracao: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub user_id: Uuid,
    pub multiplicador_responsavel: String,
    pub nome_pdv: String,
    pub tipo_estrategia: String,
}

impl Fixture for OpportunityRecord {
    const TABLE: SeedTable = SeedTable::Opportunities;

    fn values(&self) -> Vec<SeedValue> {
        let mut values: Vec<SeedValue> = vec![
            self.id.into(),
            self.cod_dr.as_str().into(),
            self.dir_regional.as_str().into(),
            self.cod_gr.as_str().into(),
            self.ger_regional.as_str().into(),
            self.localizacao.as_str().into(),
            self.contato.as_str().into(),
            self.telefone.as_str().into(),
            self.data_certificacao.into(),
            self.status_tablet.as_str().into(),
            self.habilitado_consignado.into(),
            self.habilitado_lime.into(),
            self.habilitado_microsseguro.into(),
            self.cod_ag.as_str().into(),
            self.nome_agencia.as_str().into(),
            self.chave_paa.as_str().into(),
            self.nome_paa.as_str().into(),
            self.situacao.as_str().into(),
            self.ult_trx_contabil.into(),
            self.ult_trx_negocio.into(),
            self.tendencia.as_str().into(),
            self.chave_loja.as_str().into(),
            self.cnpj.as_str().into(),
            self.nome_loja.as_str().into(),
        ];
        values.extend(self.volumes.values());
        values.extend([
            SeedValue::from_option(self.data_bloqueio),
            SeedValue::from_option(self.motivo_bloqueio.clone()),
            self.data_inauguracao.into(),
            self.created_at.into(),
            self.updated_at.into(),
            self.user_id.into(),
            self.multiplicador_responsavel.as_str().into(),
            self.nome_pdv.as_str().into(),
            self.tipo_estrategia.as_str().into(),
        ]);
        values
    }
}

/// Generate `count` opportunities.
///
/// `store_keys` are the seeded store keys; when empty, placeholder
/// `LOJA###` keys are used instead.
pub fn generate_opportunities(
    rng: &mut FixtureRng,
    count: usize,
    store_keys: &[i32],
) -> Vec<OpportunityRecord> {
    (0..count)
        .map(|_| generate_opportunity(rng, store_keys))
        .collect()
}

fn generate_opportunity(rng: &mut FixtureRng, store_keys: &[i32]) -> OpportunityRecord {
    let stamp = reference_timestamp(rng);

    OpportunityRecord {
        id: random_uuid(rng),
        cod_dr: format!("{:02}", rng.int(1..=9)),
        dir_regional: format!("Diretoria {}", text::state_name(rng)),
        cod_gr: format!("{}GR", rng.int(10..=99)),
        ger_regional: text::person_name(rng),
        localizacao: text::address(rng, ", "),
        contato: text::first_name(rng),
        telefone: text::phone_number(rng),
        data_certificacao: date_within(rng, Lookback::Years(2)),
        status_tablet: rng.pick(&TABLET_STATUSES).to_string(),
        habilitado_consignado: rng.chance(0.5),
        habilitado_lime: rng.chance(0.5),
        habilitado_microsseguro: rng.chance(0.5),
        cod_ag: rng.int(1000..=9999).to_string(),
        nome_agencia: format!("Agência {}", text::city_name(rng)),
        chave_paa: format!("PAA{}", rng.int(100..=999)),
        nome_paa: format!("Ponto {}", text::neighborhood(rng)),
        situacao: rng.pick(&SITUATIONS).to_string(),
        ult_trx_contabil: date_within(rng, Lookback::Months(6)),
        ult_trx_negocio: date_within(rng, Lookback::Months(3)),
        tendencia: rng.pick(&TRENDS).to_string(),
        chave_loja: match rng.choose(store_keys) {
            Some(key) => key.to_string(),
            None => format!("LOJA{}", rng.int(100..=999)),
        },
        cnpj: cnpj_formatted(rng),
        nome_loja: format!("Loja {}", text::first_name(rng)),
        volumes: MonthlyVolumes::generate(rng, 50),
        data_bloqueio: None,
        motivo_bloqueio: None,
        data_inauguracao: date_between_lookbacks(rng, Lookback::Years(5), Lookback::Years(1)),
        created_at: stamp,
        updated_at: stamp,
        user_id: *rng.pick(&OPPORTUNITY_USERS),
        multiplicador_responsavel: text::person_name(rng),
        nome_pdv: format!("PDV {}", text::street_name(rng)),
        tipo_estrategia: STRATEGY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::to_rows;

    fn rng() -> FixtureRng {
        FixtureRng::new(42, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap())
    }

    #[test]
    fn test_rows_fit_table() {
        let records = generate_opportunities(&mut rng(), 20, &[]);
        let definition = SeedTable::Opportunities.definition();
        for row in to_rows(&records) {
            definition.validate_row(&row).unwrap();
        }
    }

    #[test]
    fn test_field_formats() {
        for record in generate_opportunities(&mut rng(), 50, &[]) {
            assert_eq!(record.cod_dr.len(), 2);
            assert!(record.cod_gr.ends_with("GR"));
            assert!(record.chave_paa.starts_with("PAA"));
            assert!(record.chave_loja.starts_with("LOJA"));
            assert!(OPPORTUNITY_USERS.contains(&record.user_id));
            assert!(record.data_bloqueio.is_none() && record.motivo_bloqueio.is_none());
            assert_eq!(record.created_at, record.updated_at);
            assert_eq!(record.tipo_estrategia, STRATEGY);
        }
    }

    #[test]
    fn test_uses_seeded_store_keys() {
        let keys = [123_456, 654_321];
        for record in generate_opportunities(&mut rng(), 20, &keys) {
            let key: i32 = record.chave_loja.parse().unwrap();
            assert!(keys.contains(&key));
        }
    }

    #[test]
    fn test_inauguration_window() {
        let reference = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        for record in generate_opportunities(&mut rng(), 50, &[]) {
            assert!(record.data_inauguracao >= Lookback::Years(5).before(reference));
            assert!(record.data_inauguracao <= Lookback::Years(1).before(reference));
        }
    }
}
