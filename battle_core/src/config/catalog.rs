//! Creature and move catalog loading

use super::{check_unit, BattleConstants, ConfigError};
use crate::battle::Team;
use crate::creature::{Creature, Move};
use crate::effectiveness::ElementType;
use crate::stats::{Stats, MAX_STAGE, MIN_STAGE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Largest move power a catalog may define
pub const MAX_POWER: u32 = 1000;

/// A species entry: types, base stats and the moves it knows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesDef {
    pub id: String,
    pub name: String,
    pub types: Vec<ElementType>,
    pub base_stats: Stats,
    /// Move ids, in slot order
    pub moves: Vec<String>,
}

/// On-disk catalog layout
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    moves: Vec<Move>,
    #[serde(default)]
    species: Vec<SpeciesDef>,
}

/// Immutable species and move definitions, validated on load
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    moves: HashMap<String, Move>,
    species: HashMap<String, SpeciesDef>,
    /// Species ids in file order
    order: Vec<String>,
}

impl Catalog {
    /// Load a catalog from a TOML file
    pub fn load(path: &Path, constants: &BattleConstants) -> Result<Self, ConfigError> {
        let file: CatalogFile = super::load_toml(path)?;
        Self::from_file(file, constants)
    }

    /// Load a catalog from a TOML string
    pub fn parse(content: &str, constants: &BattleConstants) -> Result<Self, ConfigError> {
        let file: CatalogFile = super::parse_toml(content)?;
        Self::from_file(file, constants)
    }

    /// Catalog shipped with the crate
    pub fn default_catalog() -> Result<Self, ConfigError> {
        let toml = include_str!("../../config/catalog.toml");
        Self::parse(toml, &BattleConstants::default())
    }

    fn from_file(file: CatalogFile, constants: &BattleConstants) -> Result<Self, ConfigError> {
        let mut catalog = Catalog::default();

        for mv in file.moves {
            validate_move(&mv)?;
            if catalog.moves.contains_key(&mv.id) {
                return Err(ConfigError::ValidationError(format!("duplicate move id '{}'", mv.id)));
            }
            catalog.moves.insert(mv.id.clone(), mv);
        }

        for species in file.species {
            catalog.validate_species(&species, constants)?;
            if catalog.species.contains_key(&species.id) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate species id '{}'",
                    species.id
                )));
            }
            catalog.order.push(species.id.clone());
            catalog.species.insert(species.id.clone(), species);
        }

        Ok(catalog)
    }

    fn validate_species(&self, species: &SpeciesDef, constants: &BattleConstants) -> Result<(), ConfigError> {
        if species.types.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "species '{}' needs at least one type",
                species.id
            )));
        }
        if species.base_stats.hp == 0 {
            return Err(ConfigError::ValidationError(format!(
                "species '{}' has zero base hp",
                species.id
            )));
        }
        let max_moves = constants.team.max_moves;
        if species.moves.is_empty() || species.moves.len() > max_moves {
            return Err(ConfigError::ValidationError(format!(
                "species '{}' must know 1 to {} moves, has {}",
                species.id,
                max_moves,
                species.moves.len()
            )));
        }
        for id in &species.moves {
            if !self.moves.contains_key(id) {
                return Err(ConfigError::UnknownMove {
                    species: species.id.clone(),
                    id: id.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn get_move(&self, id: &str) -> Option<&Move> {
        self.moves.get(id)
    }

    pub fn get_species(&self, id: &str) -> Option<&SpeciesDef> {
        self.species.get(id)
    }

    /// Species ids in catalog order
    pub fn species_ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    pub fn species_count(&self) -> usize {
        self.species.len()
    }

    /// Build a fresh creature of `species_id` at full HP and PP
    pub fn creature(&self, species_id: &str, constants: &BattleConstants) -> Result<Creature, ConfigError> {
        let species = self
            .species
            .get(species_id)
            .ok_or_else(|| ConfigError::UnknownSpecies(species_id.to_string()))?;

        let moves = species
            .moves
            .iter()
            .map(|id| {
                self.moves.get(id).cloned().ok_or_else(|| ConfigError::UnknownMove {
                    species: species.id.clone(),
                    id: id.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Creature::new(
            species.id.clone(),
            species.name.clone(),
            species.types.clone(),
            species.base_stats,
            moves,
            &constants.stats,
        ))
    }

    /// Build a roster from species ids, first entry active
    pub fn team<S: AsRef<str>>(&self, species_ids: &[S], constants: &BattleConstants) -> Result<Team, ConfigError> {
        if species_ids.len() > constants.team.max_size {
            return Err(ConfigError::ValidationError(format!(
                "team has {} creatures, limit is {}",
                species_ids.len(),
                constants.team.max_size
            )));
        }
        let creatures = species_ids
            .iter()
            .map(|id| self.creature(id.as_ref(), constants))
            .collect::<Result<Vec<_>, _>>()?;
        Team::new(creatures)
    }
}

fn validate_move(mv: &Move) -> Result<(), ConfigError> {
    if mv.power > MAX_POWER {
        return Err(ConfigError::ValidationError(format!(
            "move '{}' power {} exceeds {}",
            mv.id, mv.power, MAX_POWER
        )));
    }
    if mv.accuracy > 100 {
        return Err(ConfigError::ValidationError(format!(
            "move '{}' accuracy {} exceeds 100",
            mv.id, mv.accuracy
        )));
    }
    if mv.max_pp == 0 {
        return Err(ConfigError::ValidationError(format!("move '{}' has no PP", mv.id)));
    }
    if let Some(effect) = &mv.effect {
        check_unit(&format!("move '{}' effect chance", mv.id), effect.chance)?;
        check_unit(&format!("move '{}' recoil", mv.id), effect.recoil)?;
        check_unit(&format!("move '{}' drain", mv.id), effect.drain)?;
        if let Some(change) = effect.stat_change {
            if change.stages == 0 || change.stages < MIN_STAGE * 2 || change.stages > MAX_STAGE * 2 {
                return Err(ConfigError::ValidationError(format!(
                    "move '{}' stat change of {} stages",
                    mv.id, change.stages
                )));
            }
        }
    }
    Ok(())
}
