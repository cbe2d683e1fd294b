use std::time::Duration;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::harvest::HarvestNodeConfig;
use crate::shared::*;

/// One patch placement as written in the layout file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchDef {
    pub herb_id: ItemId,
    /// World position in pixels.
    pub origin: (f32, f32),
    pub spawn_radius: f32,
    pub initial_capacity: u32,
    pub overharvest_threshold: u32,
    pub regrowth_secs: f32,
    /// Fixed placement seed, for reproducible layouts.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl PatchDef {
    /// `regrowth_secs` as a delay, if it is positive and representable.
    pub fn regrowth_delay(&self) -> Option<Duration> {
        Duration::try_from_secs_f32(self.regrowth_secs)
            .ok()
            .filter(|delay| !delay.is_zero())
    }

    /// Node config for the patch at `index` in its layout.
    pub fn node_config(
        &self,
        index: usize,
        template: Option<PlantTemplate>,
    ) -> Result<HarvestNodeConfig, DataError> {
        let regrowth_delay = self.regrowth_delay().ok_or(DataError::InvalidPatch {
            index,
            field: "regrowth_secs",
            value: self.regrowth_secs,
        })?;
        Ok(HarvestNodeConfig {
            origin: Vec3::new(self.origin.0, self.origin.1, Z_PLANT),
            spawn_radius: self.spawn_radius,
            initial_capacity: self.initial_capacity,
            overharvest_threshold: self.overharvest_threshold,
            regrowth_delay,
            template,
            seed: self.seed,
        })
    }
}

/// Validated patch placements for the current scene.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatchLayout {
    pub patches: Vec<PatchDef>,
}

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to parse patch layout: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("patch {index} references unknown herb '{herb_id}'")]
    UnknownHerb { index: usize, herb_id: ItemId },
    #[error("patch {index} has invalid {field}: {value}")]
    InvalidPatch {
        index: usize,
        field: &'static str,
        value: f32,
    },
}

/// Parse a RON layout and validate each entry against the herb registry.
///
/// Returns the accepted layout plus one error per rejected entry. Only a
/// document that fails to parse at all is an `Err`. Capacities outside
/// `[MIN_PATCH_CAPACITY, MAX_PATCH_CAPACITY]` are clamped rather than rejected.
pub fn parse_patch_layout(
    source: &str,
    herbs: &HerbRegistry,
) -> Result<(PatchLayout, Vec<DataError>), DataError> {
    let raw: PatchLayout = ron::from_str(source)?;

    let mut layout = PatchLayout::default();
    let mut rejected = Vec::new();
    for (index, mut def) in raw.patches.into_iter().enumerate() {
        if let Err(err) = validate(index, &def, herbs) {
            rejected.push(err);
            continue;
        }

        let clamped = def
            .initial_capacity
            .clamp(MIN_PATCH_CAPACITY, MAX_PATCH_CAPACITY);
        if clamped != def.initial_capacity {
            warn!(
                "[Data] Patch {} capacity {} clamped to {}",
                index, def.initial_capacity, clamped
            );
            def.initial_capacity = clamped;
        }
        layout.patches.push(def);
    }

    Ok((layout, rejected))
}

fn validate(index: usize, def: &PatchDef, herbs: &HerbRegistry) -> Result<(), DataError> {
    if herbs.get(&def.herb_id).is_none() {
        return Err(DataError::UnknownHerb {
            index,
            herb_id: def.herb_id.clone(),
        });
    }
    if !def.spawn_radius.is_finite() || def.spawn_radius < 0.0 {
        return Err(DataError::InvalidPatch {
            index,
            field: "spawn_radius",
            value: def.spawn_radius,
        });
    }
    if def.overharvest_threshold == 0 {
        return Err(DataError::InvalidPatch {
            index,
            field: "overharvest_threshold",
            value: 0.0,
        });
    }
    if def.regrowth_delay().is_none() {
        return Err(DataError::InvalidPatch {
            index,
            field: "regrowth_secs",
            value: def.regrowth_secs,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{populate_herbs, DEFAULT_PATCH_LAYOUT};

    fn herbs() -> HerbRegistry {
        let mut registry = HerbRegistry::default();
        populate_herbs(&mut registry);
        registry
    }

    #[test]
    fn test_default_layout_is_valid() {
        let (layout, rejected) = parse_patch_layout(DEFAULT_PATCH_LAYOUT, &herbs()).unwrap();
        assert!(rejected.is_empty(), "rejected: {:?}", rejected);
        assert_eq!(layout.patches.len(), 6);
        assert!(layout
            .patches
            .iter()
            .all(|p| (MIN_PATCH_CAPACITY..=MAX_PATCH_CAPACITY).contains(&p.initial_capacity)));
    }

    #[test]
    fn test_bad_entries_are_skipped() {
        let source = r#"(
            patches: [
                (herb_id: "sage", origin: (0.0, 0.0), spawn_radius: 8.0,
                 initial_capacity: 3, overharvest_threshold: 2, regrowth_secs: 5.0),
                (herb_id: "yarrow", origin: (0.0, 0.0), spawn_radius: -1.0,
                 initial_capacity: 3, overharvest_threshold: 2, regrowth_secs: 5.0),
                (herb_id: "yarrow", origin: (0.0, 0.0), spawn_radius: 8.0,
                 initial_capacity: 3, overharvest_threshold: 0, regrowth_secs: 5.0),
                (herb_id: "yarrow", origin: (0.0, 0.0), spawn_radius: 8.0,
                 initial_capacity: 3, overharvest_threshold: 2, regrowth_secs: 0.0),
                (herb_id: "nettle", origin: (4.0, 8.0), spawn_radius: 8.0,
                 initial_capacity: 3, overharvest_threshold: 2, regrowth_secs: 5.0, seed: Some(9)),
            ],
        )"#;

        let (layout, rejected) = parse_patch_layout(source, &herbs()).unwrap();
        assert_eq!(layout.patches.len(), 1);
        assert_eq!(layout.patches[0].herb_id, "nettle");
        assert_eq!(layout.patches[0].seed, Some(9));
        assert_eq!(rejected.len(), 4);
        assert!(matches!(rejected[0], DataError::UnknownHerb { index: 0, .. }));
        assert!(matches!(
            rejected[1],
            DataError::InvalidPatch { field: "spawn_radius", .. }
        ));
        assert!(matches!(
            rejected[2],
            DataError::InvalidPatch { field: "overharvest_threshold", .. }
        ));
        assert!(matches!(
            rejected[3],
            DataError::InvalidPatch { field: "regrowth_secs", .. }
        ));
    }

    #[test]
    fn test_capacity_is_clamped() {
        let source = r#"(
            patches: [
                (herb_id: "lavender", origin: (0.0, 0.0), spawn_radius: 8.0,
                 initial_capacity: 40, overharvest_threshold: 2, regrowth_secs: 5.0),
                (herb_id: "lavender", origin: (0.0, 0.0), spawn_radius: 8.0,
                 initial_capacity: 0, overharvest_threshold: 2, regrowth_secs: 5.0),
            ],
        )"#;

        let (layout, rejected) = parse_patch_layout(source, &herbs()).unwrap();
        assert!(rejected.is_empty());
        assert_eq!(layout.patches[0].initial_capacity, MAX_PATCH_CAPACITY);
        assert_eq!(layout.patches[1].initial_capacity, MIN_PATCH_CAPACITY);
    }

    #[test]
    fn test_malformed_layout_is_an_error() {
        let result = parse_patch_layout("(patches: [ (herb_id: 3) ])", &herbs());
        assert!(matches!(result, Err(DataError::Parse(_))));
    }

    #[test]
    fn test_node_config_places_patch_on_plant_layer() {
        let def = PatchDef {
            herb_id: "yarrow".into(),
            origin: (12.0, -4.0),
            spawn_radius: 8.0,
            initial_capacity: 4,
            overharvest_threshold: 2,
            regrowth_secs: 2.5,
            seed: None,
        };
        let config = def.node_config(0, None).unwrap();
        assert_eq!(config.origin, Vec3::new(12.0, -4.0, Z_PLANT));
        assert_eq!(config.regrowth_delay, Duration::from_millis(2500));
        assert!(config.template.is_none());
    }

    #[test]
    fn test_unrepresentable_regrowth_delay_is_rejected() {
        let source = r#"(
            patches: [
                (herb_id: "yarrow", origin: (0.0, 0.0), spawn_radius: 8.0,
                 initial_capacity: 3, overharvest_threshold: 2, regrowth_secs: 1e30),
                (herb_id: "yarrow", origin: (0.0, 0.0), spawn_radius: 8.0,
                 initial_capacity: 3, overharvest_threshold: 2, regrowth_secs: 1e-12),
                (herb_id: "yarrow", origin: (0.0, 0.0), spawn_radius: 8.0,
                 initial_capacity: 3, overharvest_threshold: 2, regrowth_secs: 30.0),
            ],
        )"#;

        let (layout, rejected) = parse_patch_layout(source, &herbs()).unwrap();
        assert_eq!(layout.patches.len(), 1);
        assert_eq!(rejected.len(), 2);
        assert!(rejected.iter().all(|err| matches!(
            err,
            DataError::InvalidPatch { field: "regrowth_secs", .. }
        )));
    }

    #[test]
    fn test_node_config_refuses_huge_delay() {
        let def = PatchDef {
            herb_id: "yarrow".into(),
            origin: (0.0, 0.0),
            spawn_radius: 8.0,
            initial_capacity: 4,
            overharvest_threshold: 2,
            regrowth_secs: 1e30,
            seed: None,
        };
        assert!(matches!(
            def.node_config(3, None),
            Err(DataError::InvalidPatch { index: 3, field: "regrowth_secs", .. })
        ));
    }
}
