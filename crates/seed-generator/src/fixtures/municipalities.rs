//! `MUNICIPIOS_PRIORITARIOS`: priority municipalities with IBGE-style codes.

use super::Fixture;
use crate::generators::text;
use crate::hierarchy::OrgTree;
use crate::{FixtureRng, GeneratorError};
use seed_core::{SeedTable, SeedValue};
use serde::Serialize;
use std::collections::HashSet;
use std::ops::RangeInclusive;

/// IBGE state prefixes.
pub const UF_IBGE_PREFIXES: [(&str, i32); 27] = [
    ("RO", 11),
    ("AC", 12),
    ("AM", 13),
    ("RR", 14),
    ("PA", 15),
    ("AP", 16),
    ("TO", 17),
    ("MA", 21),
    ("PI", 22),
    ("CE", 23),
    ("RN", 24),
    ("PB", 25),
    ("PE", 26),
    ("AL", 27),
    ("SE", 28),
    ("BA", 29),
    ("MG", 31),
    ("ES", 32),
    ("RJ", 33),
    ("SP", 35),
    ("PR", 41),
    ("SC", 42),
    ("RS", 43),
    ("MS", 50),
    ("MT", 51),
    ("GO", 52),
    ("DF", 53),
];

/// Municipality suffix range appended to the state prefix.
pub const CODE_SUFFIX_RANGE: RangeInclusive<i32> = 1..=89_999;

const CODE_PREFIX_FACTOR: i32 = 100_000;

const NAME_SUFFIXES: [&str; 7] = [
    " do Norte",
    " do Sul",
    " de Baixo",
    " das Pedras",
    " do Vale",
    " dos Campos",
    "",
];

/// IBGE prefix for a state abbreviation.
pub fn uf_prefix(uf: &str) -> Option<i32> {
    UF_IBGE_PREFIXES
        .iter()
        .find(|(abbr, _)| *abbr == uf)
        .map(|(_, prefix)| *prefix)
}

/// Number of distinct codes the prefix/suffix scheme can produce.
pub fn code_space() -> usize {
    let suffixes = (CODE_SUFFIX_RANGE.end() - CODE_SUFFIX_RANGE.start() + 1) as usize;
    UF_IBGE_PREFIXES.len() * suffixes
}

/// Hierarchy keys every priority municipality is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MunicipalityAnchor {
    pub supervision: i32,
    pub coordination: i32,
    pub area: i32,
}

impl MunicipalityAnchor {
    /// Supervision key used when no profile overrides it.
    pub const DEFAULT_SUPERVISION: i32 = 40_002;

    /// Resolve a supervision key to its coordination and area.
    pub fn from_tree(tree: &OrgTree, supervision: i32) -> Result<Self, GeneratorError> {
        let path = tree
            .path_for_supervision(supervision)
            .ok_or(GeneratorError::UnknownSupervision(supervision))?;
        let keys = tree.keys(&path);
        Ok(Self {
            supervision: keys.supervision,
            coordination: keys.coordination,
            area: keys.area,
        })
    }
}

/// One `MUNICIPIOS_PRIORITARIOS` row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct MunicipalityRecord {
    pub cd_munic: i32,
    pub municipio: String,
    pub uf: String,
    pub chave_sup: i32,
    pub chave_coord: i32,
    pub chave_gerente: i32,
}

impl Fixture for MunicipalityRecord {
    const TABLE: SeedTable = SeedTable::Municipalities;

    fn values(&self) -> Vec<SeedValue> {
        vec![
            self.cd_munic.into(),
            self.municipio.as_str().into(),
            self.uf.as_str().into(),
            self.chave_sup.into(),
            self.chave_coord.into(),
            self.chave_gerente.into(),
        ]
    }
}

/// Generate `count` municipalities with distinct codes.
pub fn generate_municipalities(
    rng: &mut FixtureRng,
    count: usize,
    anchor: MunicipalityAnchor,
) -> Result<Vec<MunicipalityRecord>, GeneratorError> {
    let available = code_space();
    if count > available {
        return Err(GeneratorError::CodeSpaceExhausted {
            table: SeedTable::Municipalities,
            requested: count,
            available,
        });
    }

    let mut used = HashSet::with_capacity(count);
    let mut records = Vec::with_capacity(count);
    while records.len() < count {
        let (uf, prefix) = *rng.pick(&UF_IBGE_PREFIXES);
        let cd_munic = prefix * CODE_PREFIX_FACTOR + rng.int(CODE_SUFFIX_RANGE);
        if !used.insert(cd_munic) {
            continue;
        }
        let municipio = format!("{}{}", text::city_name(rng), rng.pick(&NAME_SUFFIXES));
        records.push(MunicipalityRecord {
            cd_munic,
            municipio,
            uf: uf.to_string(),
            chave_sup: anchor.supervision,
            chave_coord: anchor.coordination,
            chave_gerente: anchor.area,
        });
    }
    Ok(records)
}
