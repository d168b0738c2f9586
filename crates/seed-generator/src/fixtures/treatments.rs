//! `MUNICIPIOS_PRIORITARIOS_TRATATIVAS`: follow-ups on priority
//! municipalities.

use super::Fixture;
use crate::generators::document::cnpj_digits;
use crate::generators::temporal::business_datetime_within;
use crate::{FixtureRng, GeneratorError};
use chrono::{Duration, NaiveDateTime};
use seed_core::{SeedTable, SeedValue};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User recorded on follow-ups that carry a user id.
pub const TREATMENT_USER_ID: Uuid = Uuid::from_u128(0x8ABD1646_FEC3_4AD3_B130_5D4A961365DB);

/// Display name written on every follow-up.
pub const TREATMENT_USER_NAME: &str = "João Silva";

const STORE_NAMES: [&str; 8] = [
    "Mercearia São José",
    "Padaria Pão Quente",
    "Lojão do Centro",
    "Armarinhos Estrela",
    "Casa do Norte",
    "Empório do Vale",
    "Bazar Dois Irmãos",
    "Mini Mercado Primavera",
];

const NOTES: [&str; 8] = [
    "Contato realizado por telefone. Aguardando retorno.",
    "Visita produtiva. Demanda por maquininha e antecipação.",
    "Sem interesse no momento. Reavaliar em 60 dias.",
    "Solicitar material de apoio e proposta revisada.",
    "Ponto com bom fluxo. Possível implantação mês que vem.",
    "Solicitou esclarecimentos sobre taxas e prazo de repasse.",
    "Cliente pediu simulação para comparar com concorrente.",
    "Sem CNPJ, mas loja em operação. Avaliar MEI.",
];

/// Persisted `'Sim'` / `'Não'` answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum YesNo {
    #[serde(rename = "Sim")]
    Yes,
    #[serde(rename = "Não")]
    No,
}

impl YesNo {
    /// `Yes` with probability `p`.
    pub fn draw(rng: &mut FixtureRng, p: f64) -> Self {
        if rng.chance(p) {
            Self::Yes
        } else {
            Self::No
        }
    }

    pub fn is_yes(&self) -> bool {
        matches!(self, Self::Yes)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "Sim",
            Self::No => "Não",
        }
    }
}

/// Knobs for follow-up generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreatmentOptions {
    /// Upper bound on generated follow-ups; one per municipality at most.
    pub count: usize,
    /// Probability that a follow-up has no CNPJ and names the store instead.
    pub p_sem_cnpj: f64,
}

impl Default for TreatmentOptions {
    fn default() -> Self {
        Self {
            count: 20,
            p_sem_cnpj: 0.5,
        }
    }
}

/// One follow-up row. `ID_TRATATIVA` is assigned by the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct TreatmentRecord {
    pub user_id: Option<Uuid>,
    pub user: String,
    pub cd_munic: i32,
    pub data_tratativa: NaiveDateTime,
    pub data_visita: Option<NaiveDateTime>,
    pub cnpj: Option<String>,
    pub sem_cnpj: bool,
    pub nome_loja: Option<String>,
    pub ramo_atividade_referencia: YesNo,
    pub houve_interesse: YesNo,
    pub contrato_enviado: YesNo,
    pub observacao: String,
}

impl TreatmentRecord {
    /// `SEM_CNPJ` ⇔ `CNPJ` is null ⇔ `NOME_LOJA` is present.
    pub fn tax_id_pairing_holds(&self) -> bool {
        self.sem_cnpj == self.cnpj.is_none() && self.sem_cnpj == self.nome_loja.is_some()
    }

    /// A visit, when present, is not before the follow-up itself.
    pub fn visit_order_holds(&self) -> bool {
        self.data_visita
            .map(|visit| visit >= self.data_tratativa)
            .unwrap_or(true)
    }

    /// A contract is only sent after interest was shown.
    pub fn contract_requires_interest(&self) -> bool {
        !self.contrato_enviado.is_yes() || self.houve_interesse.is_yes()
    }
}

impl Fixture for TreatmentRecord {
    const TABLE: SeedTable = SeedTable::Treatments;

    fn values(&self) -> Vec<SeedValue> {
        vec![
            SeedValue::from_option(self.user_id),
            self.user.as_str().into(),
            self.cd_munic.into(),
            self.data_tratativa.into(),
            SeedValue::from_option(self.data_visita),
            SeedValue::from_option(self.cnpj.clone()),
            self.sem_cnpj.into(),
            SeedValue::from_option(self.nome_loja.clone()),
            self.ramo_atividade_referencia.as_str().into(),
            self.houve_interesse.as_str().into(),
            self.contrato_enviado.as_str().into(),
            self.observacao.as_str().into(),
        ]
    }
}

/// Generate follow-ups for a random subset of municipalities.
///
/// Produces `min(options.count, municipality_codes.len())` records, each for
/// a distinct municipality.
pub fn generate_treatments(
    rng: &mut FixtureRng,
    municipality_codes: &[i32],
    options: TreatmentOptions,
) -> Result<Vec<TreatmentRecord>, GeneratorError> {
    if municipality_codes.is_empty() {
        return Err(GeneratorError::EmptyReference {
            table: SeedTable::Treatments,
        });
    }

    let mut codes = municipality_codes.to_vec();
    rng.shuffle(&mut codes);
    codes.truncate(options.count);

    Ok(codes
        .into_iter()
        .map(|cd_munic| generate_treatment(rng, cd_munic, options.p_sem_cnpj))
        .collect())
}

fn generate_treatment(rng: &mut FixtureRng, cd_munic: i32, p_sem_cnpj: f64) -> TreatmentRecord {
    let sem_cnpj = rng.chance(p_sem_cnpj);
    let (cnpj, nome_loja) = if sem_cnpj {
        (None, Some(rng.pick(&STORE_NAMES).to_string()))
    } else {
        (Some(cnpj_digits(rng)), None)
    };

    let data_tratativa = business_datetime_within(rng, 30);
    let data_visita = rng.maybe(0.7, |r| {
        data_tratativa + Duration::days(i64::from(r.int(0..=10)))
    });

    let ramo_atividade_referencia = YesNo::draw(rng, 0.5);
    let houve_interesse = YesNo::draw(rng, 0.55);
    let contrato_enviado = if houve_interesse.is_yes() {
        YesNo::draw(rng, 0.7)
    } else {
        YesNo::No
    };

    let user_id = if rng.chance(0.4) {
        None
    } else {
        Some(TREATMENT_USER_ID)
    };

    TreatmentRecord {
        user_id,
        user: TREATMENT_USER_NAME.to_string(),
        cd_munic,
        data_tratativa,
        data_visita,
        cnpj,
        sem_cnpj,
        nome_loja,
        ramo_atividade_referencia,
        houve_interesse,
        contrato_enviado,
        observacao: rng.pick(&NOTES).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::HashSet;

    fn rng(seed: u64) -> FixtureRng {
        FixtureRng::new(seed, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap())
    }

    fn codes(n: i32) -> Vec<i32> {
        (0..n).map(|i| 3_500_001 + i).collect()
    }

    #[test]
    fn test_twenty_from_twenty_never_both_cnpj_and_name() {
        for seed in 0..25 {
            let records = generate_treatments(&mut rng(seed), &codes(20), TreatmentOptions::default())
                .unwrap();
            assert_eq!(records.len(), 20);
            for record in &records {
                assert!(!(record.cnpj.is_some() && record.nome_loja.is_some()));
                assert!(record.tax_id_pairing_holds());
                assert!(record.visit_order_holds());
                assert!(record.contract_requires_interest());
            }
        }
    }

    #[test]
    fn test_one_record_per_municipality() {
        let records =
            generate_treatments(&mut rng(3), &codes(50), TreatmentOptions::default()).unwrap();
        assert_eq!(records.len(), 20);
        let distinct: HashSet<i32> = records.iter().map(|r| r.cd_munic).collect();
        assert_eq!(distinct.len(), 20);

        let few = generate_treatments(&mut rng(3), &codes(5), TreatmentOptions::default()).unwrap();
        assert_eq!(few.len(), 5);
    }

    #[test]
    fn test_sem_cnpj_probability_extremes() {
        let always = TreatmentOptions {
            count: 20,
            p_sem_cnpj: 1.0,
        };
        let records = generate_treatments(&mut rng(1), &codes(20), always).unwrap();
        assert!(records.iter().all(|r| r.sem_cnpj && r.cnpj.is_none()));

        let never = TreatmentOptions {
            count: 20,
            p_sem_cnpj: 0.0,
        };
        let records = generate_treatments(&mut rng(1), &codes(20), never).unwrap();
        for record in &records {
            let cnpj = record.cnpj.as_deref().unwrap();
            assert_eq!(cnpj.len(), 14);
            assert!(cnpj.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_no_municipalities_is_an_error() {
        assert!(matches!(
            generate_treatments(&mut rng(1), &[], TreatmentOptions::default()),
            Err(GeneratorError::EmptyReference {
                table: SeedTable::Treatments
            })
        ));
    }

    #[test]
    fn test_yes_no_serializes_in_portuguese() {
        assert_eq!(serde_json::to_string(&YesNo::Yes).unwrap(), "\"Sim\"");
        assert_eq!(serde_json::to_string(&YesNo::No).unwrap(), "\"Não\"");
    }

    #[test]
    fn test_user_id_constant() {
        assert_eq!(
            TREATMENT_USER_ID.hyphenated().to_string().to_uppercase(),
            "8ABD1646-FEC3-4AD3-B130-5D4A961365DB"
        );
    }
}
