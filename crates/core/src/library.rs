//! The persisted library: characters and scenes as one replaceable unit.
//!
//! `AppData` is what the storage adapter loads and saves wholesale. The
//! two collections are independently keyed sets (ids unique within each);
//! there are no cross-entity guarantees, and deleting a character never
//! cascades into the scenes that reference it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::character::Character;
use crate::error::CoreError;
use crate::scene::Scene;

/// The unit of persistence: the whole library, replaced on every save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AppData {
    #[serde(default)]
    pub characters: Vec<Character>,
    #[serde(default)]
    pub scenes: Vec<Scene>,
}

impl AppData {
    /// Check the id-uniqueness invariant on both collections.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut seen = HashSet::with_capacity(self.characters.len());
        for character in &self.characters {
            if !seen.insert(character.id) {
                return Err(CoreError::Conflict(format!(
                    "Duplicate character id: {}",
                    character.id
                )));
            }
        }
        let mut seen = HashSet::with_capacity(self.scenes.len());
        for scene in &self.scenes {
            if !seen.insert(scene.id) {
                return Err(CoreError::Conflict(format!(
                    "Duplicate scene id: {}",
                    scene.id
                )));
            }
        }
        Ok(())
    }

    /// Append a character, rejecting duplicate ids.
    pub fn insert_character(&mut self, character: Character) -> Result<(), CoreError> {
        if self.character(character.id).is_some() {
            return Err(CoreError::Conflict(format!(
                "Duplicate character id: {}",
                character.id
            )));
        }
        self.characters.push(character);
        Ok(())
    }

    /// Remove a character by id. Returns `false` when no such character
    /// exists. Scenes referencing the id are left untouched.
    pub fn remove_character(&mut self, id: Uuid) -> bool {
        let before = self.characters.len();
        self.characters.retain(|c| c.id != id);
        self.characters.len() != before
    }

    /// Prepend a scene (the library lists newest scenes first), rejecting
    /// duplicate ids.
    pub fn insert_scene(&mut self, scene: Scene) -> Result<(), CoreError> {
        if self.scene(scene.id).is_some() {
            return Err(CoreError::Conflict(format!(
                "Duplicate scene id: {}",
                scene.id
            )));
        }
        self.scenes.insert(0, scene);
        Ok(())
    }

    /// Remove a scene by id. Returns `false` when no such scene exists.
    pub fn remove_scene(&mut self, id: Uuid) -> bool {
        let before = self.scenes.len();
        self.scenes.retain(|s| s.id != id);
        self.scenes.len() != before
    }

    pub fn character(&self, id: Uuid) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn scene(&self, id: Uuid) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == id)
    }

    /// Resolve a selection of character ids to entities, failing on the
    /// first id not present in the library.
    pub fn resolve_characters(&self, ids: &[Uuid]) -> Result<Vec<&Character>, CoreError> {
        ids.iter()
            .map(|&id| {
                self.character(id).ok_or(CoreError::NotFound {
                    entity: "Character",
                    id,
                })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CreateCharacter;
    use crate::scene::CreateScene;

    fn character(name: &str) -> Character {
        Character::from_input(CreateCharacter {
            name: name.to_string(),
            image_url: "data:image/png;base64,AAAA".to_string(),
            style: String::new(),
            gender: String::new(),
            age: String::new(),
            outfit: String::new(),
            expression: String::new(),
        })
    }

    fn scene_for(ids: Vec<Uuid>) -> Scene {
        Scene::from_input(CreateScene {
            image_url: "data:image/png;base64,BBBB".to_string(),
            prompt: "a forest clearing".to_string(),
            character_ids: ids,
        })
    }

    #[test]
    fn insert_character_rejects_duplicate_id() {
        let mut data = AppData::default();
        let alice = character("Alice");
        data.insert_character(alice.clone()).unwrap();
        assert!(data.insert_character(alice).is_err());
    }

    #[test]
    fn remove_character_does_not_cascade_to_scenes() {
        let mut data = AppData::default();
        let alice = character("Alice");
        let alice_id = alice.id;
        data.insert_character(alice).unwrap();
        data.insert_scene(scene_for(vec![alice_id])).unwrap();

        assert!(data.remove_character(alice_id));

        // The scene keeps its dangling reference.
        assert_eq!(data.scenes[0].character_ids, vec![alice_id]);
    }

    #[test]
    fn remove_missing_character_returns_false() {
        let mut data = AppData::default();
        assert!(!data.remove_character(Uuid::new_v4()));
    }

    #[test]
    fn scenes_are_listed_newest_first() {
        let mut data = AppData::default();
        let first = scene_for(vec![]);
        let second = scene_for(vec![]);
        let second_id = second.id;
        data.insert_scene(first).unwrap();
        data.insert_scene(second).unwrap();
        assert_eq!(data.scenes[0].id, second_id);
    }

    #[test]
    fn validate_detects_duplicate_ids() {
        let alice = character("Alice");
        let data = AppData {
            characters: vec![alice.clone(), alice],
            scenes: vec![],
        };
        assert!(data.validate().is_err());
    }

    #[test]
    fn resolve_characters_preserves_selection_order() {
        let mut data = AppData::default();
        let alice = character("Alice");
        let bob = character("Bob");
        let (a, b) = (alice.id, bob.id);
        data.insert_character(alice).unwrap();
        data.insert_character(bob).unwrap();

        let resolved = data.resolve_characters(&[b, a]).unwrap();
        assert_eq!(resolved[0].name, "Bob");
        assert_eq!(resolved[1].name, "Alice");
    }

    #[test]
    fn resolve_characters_fails_on_unknown_id() {
        let data = AppData::default();
        let missing = Uuid::new_v4();
        let err = data.resolve_characters(&[missing]).unwrap_err();
        assert!(matches!(err, CoreError::NotFound { id, .. } if id == missing));
    }

    #[test]
    fn appdata_json_round_trip_uses_camel_case() {
        let mut data = AppData::default();
        let alice = character("Alice");
        let alice_id = alice.id;
        data.insert_character(alice).unwrap();
        data.insert_scene(scene_for(vec![alice_id])).unwrap();

        let json = serde_json::to_value(&data).unwrap();
        assert!(json["characters"][0]["imageUrl"].is_string());
        assert!(json["scenes"][0]["characterIds"].is_array());

        let back: AppData = serde_json::from_value(json).unwrap();
        assert_eq!(back, data);
    }
}
