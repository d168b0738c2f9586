//! `HOTLIST`: stores flagged for a supervisor's attention.

use super::Fixture;
use crate::generators::document::cnpj_formatted;
use crate::generators::text;
use crate::generators::uuid::random_uuid;
use crate::FixtureRng;
use seed_core::{SeedTable, SeedValue};
use serde::Serialize;
use uuid::Uuid;

/// Supervisor every hotlist entry belongs to.
pub const HOTLIST_SUPERVISOR: Uuid = Uuid::from_u128(0x8ABD1646_FEC3_4AD3_B130_5D4A961365DB);

const SITUATIONS: [&str; 4] = ["pendente", "realizar", "tratada", "bloqueada"];
const MARKETS: [&str; 4] = ["Mercado", "Padaria", "Açougue", "Lanchonete"];
const PRESENCE: [&str; 2] = ["SIM", "NAO"];
const DIRECTORATES: [&str; 4] = ["DR São Paulo", "DR Rio de Janeiro", "DR Sul", "DR Nordeste"];
const MANAGEMENTS: [&str; 3] = ["GR Norte", "GR Sul", "GR Central"];
const AGENCY_COUNT: i32 = 50;
const MANAGER_POOL: usize = 10;

/// One `HOTLIST` row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotlistRecord {
    pub id: Uuid,
    pub supervisor_id: Uuid,
    #[serde(rename = "CNPJ")]
    pub cnpj: String,
    #[serde(rename = "NOME_LOJA")]
    pub nome_loja: String,
    #[serde(rename = "LOCALIZACAO")]
    pub localizacao: String,
    #[serde(rename = "AGENCIA")]
    pub agencia: String,
    #[serde(rename = "MERCADO")]
    pub mercado: String,
    #[serde(rename = "PRACA_PRESENCA")]
    pub praca_presenca: String,
    pub situacao: String,
    #[serde(rename = "DIRETORIA_REGIONAL")]
    pub diretoria_regional: String,
    #[serde(rename = "GERENCIA_REGIONAL")]
    pub gerencia_regional: String,
    #[serde(rename = "PA")]
    pub pa: String,
    #[serde(rename = "GERENTE_PJ")]
    pub gerente_pj: String,
}

impl Fixture for HotlistRecord {
    const TABLE: SeedTable = SeedTable::Hotlist;

    fn values(&self) -> Vec<SeedValue> {
        vec![
            self.id.into(),
            self.supervisor_id.into(),
            self.cnpj.as_str().into(),
            self.nome_loja.as_str().into(),
            self.localizacao.as_str().into(),
            self.agencia.as_str().into(),
            self.mercado.as_str().into(),
            self.praca_presenca.as_str().into(),
            self.situacao.as_str().into(),
            self.diretoria_regional.as_str().into(),
            self.gerencia_regional.as_str().into(),
            self.pa.as_str().into(),
            self.gerente_pj.as_str().into(),
        ]
    }
}

/// Generate `count` hotlist entries.
///
/// Managers are drawn from a pool of ten names generated up front.
pub fn generate_hotlist(rng: &mut FixtureRng, count: usize) -> Vec<HotlistRecord> {
    let managers: Vec<String> = (0..MANAGER_POOL).map(|_| text::person_name(rng)).collect();

    (0..count)
        .map(|_| HotlistRecord {
            id: random_uuid(rng),
            supervisor_id: HOTLIST_SUPERVISOR,
            cnpj: cnpj_formatted(rng),
            nome_loja: format!("{} {}", rng.pick(&MARKETS), text::first_name(rng)),
            localizacao: format!("{} - {}", text::city_name(rng), text::state_abbr(rng)),
            agencia: format!("{:04}", rng.int(1..=AGENCY_COUNT)),
            mercado: rng.pick(&MARKETS).to_string(),
            praca_presenca: rng.pick(&PRESENCE).to_string(),
            situacao: rng.pick(&SITUATIONS).to_string(),
            diretoria_regional: rng.pick(&DIRECTORATES).to_string(),
            gerencia_regional: rng.pick(&MANAGEMENTS).to_string(),
            pa: format!("PA {:03}", rng.int(1..=999)),
            gerente_pj: rng.choose(&managers).cloned().unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::HashSet;

    fn rng() -> FixtureRng {
        FixtureRng::new(42, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap())
    }

    #[test]
    fn test_hotlist_shape() {
        let records = generate_hotlist(&mut rng(), 20);
        assert_eq!(records.len(), 20);
        let managers: HashSet<&str> = records.iter().map(|r| r.gerente_pj.as_str()).collect();
        assert!(managers.len() <= MANAGER_POOL);
        for record in &records {
            assert_eq!(record.supervisor_id, HOTLIST_SUPERVISOR);
            assert_eq!(record.agencia.len(), 4);
            assert!(record.pa.starts_with("PA "));
            assert!(record.localizacao.contains(" - "));
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let records = generate_hotlist(&mut rng(), 200);
        let ids: HashSet<Uuid> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn test_json_column_names() {
        let record = &generate_hotlist(&mut rng(), 1)[0];
        let json = serde_json::to_value(record).unwrap();
        assert!(json.get("id").is_some());
        assert!(json.get("situacao").is_some());
        assert!(json.get("GERENTE_PJ").is_some());
    }
}
