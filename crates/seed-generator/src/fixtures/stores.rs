//! `TB_ESTR_LOJAS`: store/outlet structure with the organizational chain.

use super::Fixture;
use crate::generators::document::cnpj_formatted;
use crate::generators::temporal::{date_within, Lookback};
use crate::generators::text;
use crate::hierarchy::{distribute, HierarchyKeys, HierarchyPath, OrgTree};
use crate::FixtureRng;
use chrono::NaiveDate;
use seed_core::{SeedTable, SeedValue};
use serde::Serialize;

const SEGMENTS: [&str; 5] = ["Mercado", "Farmácia", "Vestuário", "Padaria", "Posto"];
const TABLET_STATUSES: [&str; 3] = ["RETIRADO", "S/ TABLET", "INSTALADO"];
const QUADRANTS: [&str; 3] = ["PRESENÇA", "PA", "AGÊNCIA"];

/// Point-of-service type; every seeded store is traditional.
pub const POST_TYPE: &str = "TRADICIONAL";

/// IBGE code written on every store row.
pub const STORE_IBGE_CODE: i32 = 4_100_707;

const MUNICIPALITIES: [(&str, &str); 68] = [
    ("São Paulo", "SP"),
    ("Campinas", "SP"),
    ("Santos", "SP"),
    ("Sorocaba", "SP"),
    ("Ribeirão Preto", "SP"),
    ("Osasco", "SP"),
    ("Santo André", "SP"),
    ("São Bernardo do Campo", "SP"),
    ("Guarulhos", "SP"),
    ("Piracicaba", "SP"),
    ("Jundiaí", "SP"),
    ("Bauru", "SP"),
    ("Rio de Janeiro", "RJ"),
    ("Niterói", "RJ"),
    ("Nova Iguaçu", "RJ"),
    ("Duque de Caxias", "RJ"),
    ("Petrópolis", "RJ"),
    ("Volta Redonda", "RJ"),
    ("Campos dos Goytacazes", "RJ"),
    ("Belford Roxo", "RJ"),
    ("Belo Horizonte", "MG"),
    ("Uberlândia", "MG"),
    ("Contagem", "MG"),
    ("Juiz de Fora", "MG"),
    ("Betim", "MG"),
    ("Montes Claros", "MG"),
    ("Uberaba", "MG"),
    ("Governador Valadares", "MG"),
    ("Salvador", "BA"),
    ("Feira de Santana", "BA"),
    ("Vitória da Conquista", "BA"),
    ("Camaçari", "BA"),
    ("Juazeiro", "BA"),
    ("Lauro de Freitas", "BA"),
    ("Ilhéus", "BA"),
    ("Itabuna", "BA"),
    ("Curitiba", "PR"),
    ("Londrina", "PR"),
    ("Maringá", "PR"),
    ("Ponta Grossa", "PR"),
    ("Cascavel", "PR"),
    ("São José dos Pinhais", "PR"),
    ("Foz do Iguaçu", "PR"),
    ("Colombo", "PR"),
    ("Porto Alegre", "RS"),
    ("Caxias do Sul", "RS"),
    ("Pelotas", "RS"),
    ("Canoas", "RS"),
    ("Santa Maria", "RS"),
    ("Gravataí", "RS"),
    ("Viamão", "RS"),
    ("Novo Hamburgo", "RS"),
    ("Fortaleza", "CE"),
    ("Caucaia", "CE"),
    ("Juazeiro do Norte", "CE"),
    ("Maracanaú", "CE"),
    ("Sobral", "CE"),
    ("Crato", "CE"),
    ("Itapipoca", "CE"),
    ("Maranguape", "CE"),
    ("Recife", "PE"),
    ("Jaboatão dos Guararapes", "PE"),
    ("Olinda", "PE"),
    ("Caruaru", "PE"),
    ("Petrolina", "PE"),
    ("Paulista", "PE"),
    ("Cabo de Santo Agostinho", "PE"),
    ("Garanhuns", "PE"),
];

/// Store situation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StoreStatus {
    #[serde(rename = "ATIVA")]
    Active,
    #[serde(rename = "BLOQUEADO")]
    Blocked,
    #[serde(rename = "EM PROCESSO DE ENCERRAMENTO")]
    Closing,
}

impl StoreStatus {
    pub const ALL: [StoreStatus; 3] = [Self::Active, Self::Blocked, Self::Closing];

    /// Persisted spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ATIVA",
            Self::Blocked => "BLOQUEADO",
            Self::Closing => "EM PROCESSO DE ENCERRAMENTO",
        }
    }
}

/// One `TB_ESTR_LOJAS` row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct StoreRecord {
    pub chave_loja: i32,
    pub cnpj: String,
    pub nome_loja: String,
    pub desc_segto: String,
    pub cod_ag_relacionamento: i32,
    pub nr_pacb: Option<i32>,
    pub ag_relacionamento: String,
    pub chave_paa: Option<i32>,
    pub nome_paa: Option<String>,
    pub dt_envio_van: NaiveDate,
    pub dt_inauguracao: NaiveDate,
    pub dt_inauguracao_bacen: Option<NaiveDate>,
    pub dt_encerramento_bacen: Option<NaiveDate>,
    pub motivo_encerramento: Option<String>,
    pub dt_retirada_eqto: NaiveDate,
    pub status_tablet: String,
    pub dt_implantacao_tablet: NaiveDate,
    pub dt_retirada_tablet: NaiveDate,
    pub gte_resp_loja: String,
    pub telefone_padrao: String,
    pub dt_bloqueio: Option<NaiveDate>,
    pub motivo_bloqueio: Option<String>,
    pub tipo_posto: String,
    pub be_avancado: bool,
    pub be_org_pagador: bool,
    pub be_plataforma: bool,
    pub endereco: String,
    pub cod_ibge: i32,
    pub municipio: String,
    pub uf: String,
    pub quadrante: String,
    pub cod_mult: Option<i32>,
    pub multiplicador: String,
    pub dire_reg: i32,
    pub dir_regional: String,
    pub cod_ger_reg: i32,
    pub ger_regional: String,
    pub chave_gerencia_area: i32,
    pub desc_gerencia_area: String,
    pub chave_coordenacao: i32,
    pub desc_coordenacao: String,
    pub chave_supervisao: i32,
    pub desc_supervisao: String,
    pub cod_ilha: Option<i32>,
    pub desc_ilha: Option<String>,
    pub nome_ilha: Option<String>,
    pub chave_gerencia_negocio: Option<i32>,
    pub desc_gerencia_negocio: Option<String>,
    pub situacao: StoreStatus,
    pub dt_ult_transacao: Option<NaiveDate>,
    pub habilitado_conta: bool,
    pub habilitado_micro: bool,
    pub habilitado_lime: bool,
    pub habilitado_consig: bool,
    pub saldo_cx: Option<f64>,
    pub limite: Option<f64>,
    #[serde(skip)]
    pub path: HierarchyPath,
}

impl StoreRecord {
    /// Hierarchy keys as persisted.
    pub fn hierarchy_keys(&self) -> HierarchyKeys {
        HierarchyKeys {
            directorate: self.dire_reg,
            area: self.chave_gerencia_area,
            coordination: self.chave_coordenacao,
            supervision: self.chave_supervisao,
        }
    }

    /// Names of optional field pairs whose presence disagrees.
    pub fn pairing_violations(&self) -> Vec<&'static str> {
        let pairs = [
            (
                "DT_ENCERRAMENTO_BACEN/MOTIVO_ENCERRAMENTO",
                self.dt_encerramento_bacen.is_some(),
                self.motivo_encerramento.is_some(),
            ),
            (
                "DT_ENCERRAMENTO_BACEN/DT_INAUGURACAO_BACEN",
                self.dt_encerramento_bacen.is_some(),
                self.dt_inauguracao_bacen.is_some(),
            ),
            (
                "DT_BLOQUEIO/MOTIVO_BLOQUEIO",
                self.dt_bloqueio.is_some(),
                self.motivo_bloqueio.is_some(),
            ),
            (
                "CHAVE_PAA/NOME_PAA",
                self.chave_paa.is_some(),
                self.nome_paa.is_some(),
            ),
            (
                "DESC_ILHA/NOME_ILHA",
                self.desc_ilha.is_some(),
                self.nome_ilha.is_some(),
            ),
            (
                "CHAVE_GERENCIA_NEGOCIO/DESC_GERENCIA_NEGOCIO",
                self.chave_gerencia_negocio.is_some(),
                self.desc_gerencia_negocio.is_some(),
            ),
        ];
        pairs
            .into_iter()
            .filter(|(_, a, b)| a != b)
            .map(|(name, _, _)| name)
            .collect()
    }
}

fn money(value: Option<f64>) -> SeedValue {
    value
        .map(|v| SeedValue::decimal_from_f64(v, 2))
        .unwrap_or(SeedValue::Null)
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl Fixture for StoreRecord {
    const TABLE: SeedTable = SeedTable::Stores;

    fn values(&self) -> Vec<SeedValue> {
        vec![
            self.chave_loja.into(),
            self.cnpj.as_str().into(),
            self.nome_loja.as_str().into(),
            self.desc_segto.as_str().into(),
            self.cod_ag_relacionamento.into(),
            SeedValue::from_option(self.nr_pacb),
            self.ag_relacionamento.as_str().into(),
            SeedValue::from_option(self.chave_paa),
            SeedValue::from_option(self.nome_paa.clone()),
            self.dt_envio_van.into(),
            self.dt_inauguracao.into(),
            SeedValue::from_option(self.dt_inauguracao_bacen),
            SeedValue::from_option(self.dt_encerramento_bacen),
            SeedValue::from_option(self.motivo_encerramento.clone()),
            self.dt_retirada_eqto.into(),
            self.status_tablet.as_str().into(),
            self.dt_implantacao_tablet.into(),
            self.dt_retirada_tablet.into(),
            self.gte_resp_loja.as_str().into(),
            self.telefone_padrao.as_str().into(),
            SeedValue::from_option(self.dt_bloqueio),
            SeedValue::from_option(self.motivo_bloqueio.clone()),
            self.tipo_posto.as_str().into(),
            self.be_avancado.into(),
            self.be_org_pagador.into(),
            self.be_plataforma.into(),
            self.endereco.as_str().into(),
            self.cod_ibge.into(),
            self.municipio.as_str().into(),
            self.uf.as_str().into(),
            self.quadrante.as_str().into(),
            SeedValue::from_option(self.cod_mult),
            self.multiplicador.as_str().into(),
            self.dire_reg.into(),
            self.dir_regional.as_str().into(),
            self.cod_ger_reg.into(),
            self.ger_regional.as_str().into(),
            self.chave_gerencia_area.into(),
            self.desc_gerencia_area.as_str().into(),
            self.chave_coordenacao.into(),
            self.desc_coordenacao.as_str().into(),
            self.chave_supervisao.into(),
            self.desc_supervisao.as_str().into(),
            SeedValue::from_option(self.cod_ilha),
            SeedValue::from_option(self.desc_ilha.clone()),
            SeedValue::from_option(self.nome_ilha.clone()),
            SeedValue::from_option(self.chave_gerencia_negocio),
            SeedValue::from_option(self.desc_gerencia_negocio.clone()),
            self.situacao.as_str().into(),
            SeedValue::from_option(self.dt_ult_transacao),
            self.habilitado_conta.into(),
            self.habilitado_micro.into(),
            self.habilitado_lime.into(),
            self.habilitado_consig.into(),
            money(self.saldo_cx),
            money(self.limite),
        ]
    }
}

/// Generate one store per key, spreading them over the tree's leaf paths.
pub fn generate_stores(rng: &mut FixtureRng, tree: &OrgTree, keys: &[i32]) -> Vec<StoreRecord> {
    let assignments = distribute(tree, keys.len(), rng);

    keys.iter()
        .zip(assignments)
        .map(|(&chave_loja, path)| generate_store(rng, tree, chave_loja, path))
        .collect()
}

fn generate_store(
    rng: &mut FixtureRng,
    tree: &OrgTree,
    chave_loja: i32,
    path: HierarchyPath,
) -> StoreRecord {
    // Optional pairs: the dependent field exists iff its trigger does
    let dt_encerramento_bacen = rng.maybe(0.1, |r| date_within(r, Lookback::Months(6)));
    let motivo_encerramento = dt_encerramento_bacen.map(|_| text::sentence(rng, 4));
    let dt_bloqueio = rng.maybe(0.1, |r| date_within(r, Lookback::Months(3)));
    let motivo_bloqueio = dt_bloqueio.map(|_| text::sentence(rng, 5));
    let chave_paa = rng.maybe(0.6, |r| r.int(1000..=9999));
    let nome_paa = chave_paa.map(|_| text::person_name(rng));
    let cod_mult = rng.maybe(0.6, |r| r.int(1..=999));
    let desc_ilha = rng.maybe(0.4, text::capitalized_word);
    let nome_ilha = desc_ilha.as_ref().map(|_| text::person_name(rng));
    let chave_gerencia_negocio = rng.maybe(0.4, |r| r.int(10_000..=99_999));
    let desc_gerencia_negocio = chave_gerencia_negocio.map(|_| text::person_name(rng));
    let dt_ult_transacao = rng.maybe(0.8, |r| date_within(r, Lookback::Months(2)));

    let directorate = tree.node(path.directorate);
    let area = tree.node(path.area);
    let coordination = tree.node(path.coordination);
    let supervision = tree.node(path.supervision);
    let (municipio, uf) = *rng.pick(&MUNICIPALITIES);

    StoreRecord {
        chave_loja,
        cnpj: cnpj_formatted(rng),
        nome_loja: text::company_name(rng),
        desc_segto: rng.pick(&SEGMENTS).to_string(),
        cod_ag_relacionamento: rng.int(1000..=9999),
        nr_pacb: rng.maybe(0.7, |r| r.int(1..=999)),
        ag_relacionamento: text::city_name(rng),
        chave_paa,
        nome_paa,
        dt_envio_van: date_within(rng, Lookback::Years(3)),
        dt_inauguracao: date_within(rng, Lookback::Years(3)),
        dt_inauguracao_bacen: dt_encerramento_bacen.map(|_| date_within(rng, Lookback::Years(3))),
        dt_encerramento_bacen,
        motivo_encerramento,
        dt_retirada_eqto: date_within(rng, Lookback::Years(1)),
        status_tablet: rng.pick(&TABLET_STATUSES).to_string(),
        dt_implantacao_tablet: date_within(rng, Lookback::Years(3)),
        dt_retirada_tablet: date_within(rng, Lookback::Years(1)),
        gte_resp_loja: text::person_name(rng),
        telefone_padrao: text::phone_number(rng),
        dt_bloqueio,
        motivo_bloqueio,
        tipo_posto: POST_TYPE.to_string(),
        be_avancado: rng.chance(0.5),
        be_org_pagador: rng.chance(0.5),
        be_plataforma: rng.chance(0.5),
        endereco: text::address(rng, " "),
        cod_ibge: STORE_IBGE_CODE,
        municipio: municipio.to_string(),
        uf: uf.to_string(),
        quadrante: rng.pick(&QUADRANTS).to_string(),
        cod_mult,
        multiplicador: text::person_name(rng),
        dire_reg: directorate.key,
        dir_regional: directorate.description.clone(),
        cod_ger_reg: rng.int(1000..=9999),
        ger_regional: text::city_name(rng),
        chave_gerencia_area: area.key,
        desc_gerencia_area: area.description.clone(),
        chave_coordenacao: coordination.key,
        desc_coordenacao: coordination.description.clone(),
        chave_supervisao: supervision.key,
        desc_supervisao: supervision.description.clone(),
        cod_ilha: rng.maybe(0.6, |r| r.int(10_000..=99_999)),
        desc_ilha,
        nome_ilha,
        chave_gerencia_negocio,
        desc_gerencia_negocio,
        situacao: *rng.pick(&StoreStatus::ALL),
        dt_ult_transacao,
        habilitado_conta: rng.chance(0.8),
        habilitado_micro: rng.chance(0.6),
        habilitado_lime: rng.chance(0.7),
        habilitado_consig: rng.chance(0.5),
        saldo_cx: rng.maybe(0.9, |r| round_cents(r.float(-1000.0..=10_000.0))),
        limite: rng.maybe(0.9, |r| round_cents(r.float(-5000.0..=20_000.0))),
        path,
    }
}
