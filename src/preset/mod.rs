use serde::{Deserialize, Serialize};

use crate::degrade::mode::Mode;
use crate::params::{ParamId, ParamValues};

pub mod manager;

pub use manager::Manager;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    pub name: String,
    pub description: Option<String>,
    pub author: Option<String>,
    /// Category shown next to the name, usually the mode it was built on.
    #[serde(default)]
    pub category: Option<String>,
    pub params: ParamValues,
}

impl Default for Preset {
    fn default() -> Self {
        Self {
            name: "New Preset".to_string(),
            description: None,
            author: None,
            category: None,
            params: ParamValues::default(),
        }
    }
}

impl Preset {
    pub fn new(name: String, params: ParamValues) -> Self {
        Self {
            name,
            description: None,
            author: None,
            category: None,
            params,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_author(mut self, author: &str) -> Self {
        self.author = Some(author.to_string());
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.name)?;
        if let Some(category) = &self.category {
            writeln!(f, "Category: {category}")?;
        }
        if let Some(description) = &self.description {
            writeln!(f, "Description: {description}")?;
        }
        if let Some(author) = &self.author {
            writeln!(f, "Author: {author}")?;
        }
        for id in ParamId::ALL {
            match id {
                ParamId::Mode => writeln!(f, "  {id}: {}", self.params.mode)?,
                ParamId::Bypass => writeln!(f, "  {id}: {}", self.params.bypass)?,
                _ => writeln!(f, "  {id}: {}", self.params.get(id))?,
            }
        }
        Ok(())
    }
}

fn factory(
    name: &str,
    category: &str,
    description: &str,
    params: ParamValues,
) -> Preset {
    Preset::new(name.to_string(), params)
        .with_category(category)
        .with_description(description)
        .with_author("tapeworn")
}

/// The built-in presets, always available regardless of the preset directory.
pub fn factory_presets() -> Vec<Preset> {
    let init = ParamValues::default();

    vec![
        factory("Init", "Default", "Default settings", init),
        factory(
            "Dusty Vinyl",
            "Vinyl",
            "Crackly record with a soft top end",
            ParamValues {
                noise: 10.0,
                crackle: 45.0,
                wobble: 10.0,
                saturation: 25.0,
                age: 50.0,
                filter_cutoff: 70.0,
                mode: Mode::Vinyl,
                ..init
            },
        ),
        factory(
            "Worn Cassette",
            "Cassette",
            "Hissy tape with gentle wow and the odd dropout",
            ParamValues {
                noise: 30.0,
                wobble: 35.0,
                dropout: 15.0,
                saturation: 40.0,
                age: 50.0,
                filter_cutoff: 65.0,
                ..init
            },
        ),
        factory(
            "VHS Memories",
            "VHS",
            "Muffled, warbling video soundtrack",
            ParamValues {
                noise: 25.0,
                wobble: 45.0,
                dropout: 20.0,
                saturation: 35.0,
                age: 40.0,
                filter_cutoff: 60.0,
                mode: Mode::Vhs,
                ..init
            },
        ),
        factory(
            "AM Radio",
            "Radio",
            "Narrow band broadcast with static",
            ParamValues {
                downsample: 20.0,
                noise: 40.0,
                wobble: 5.0,
                saturation: 50.0,
                age: 30.0,
                filter_res: 20.0,
                mode: Mode::Radio,
                ..init
            },
        ),
        factory(
            "Lo-Fi Beats",
            "Cassette",
            "Crunchy, slightly crushed tape for beats",
            ParamValues {
                bitcrush: 25.0,
                downsample: 15.0,
                noise: 20.0,
                crackle: 10.0,
                wobble: 25.0,
                saturation: 45.0,
                age: 35.0,
                filter_cutoff: 60.0,
                ..init
            },
        ),
        factory(
            "Old Record",
            "Vinyl",
            "Heavily aged shellac",
            ParamValues {
                bitcrush: 10.0,
                noise: 25.0,
                crackle: 80.0,
                wobble: 20.0,
                saturation: 40.0,
                age: 85.0,
                filter_cutoff: 50.0,
                mode: Mode::Vinyl,
                ..init
            },
        ),
        factory(
            "Tape Warble",
            "Cassette",
            "Exaggerated wow and flutter",
            ParamValues {
                noise: 15.0,
                wobble: 85.0,
                saturation: 30.0,
                age: 60.0,
                ..init
            },
        ),
        factory(
            "Broken TV",
            "VHS",
            "Crushed, dropping out and falling apart",
            ParamValues {
                bitcrush: 50.0,
                downsample: 40.0,
                noise: 60.0,
                wobble: 60.0,
                dropout: 60.0,
                saturation: 60.0,
                age: 100.0,
                filter_cutoff: 55.0,
                filter_drive: 30.0,
                mode: Mode::Vhs,
                ..init
            },
        ),
        factory(
            "Subtle Warmth",
            "Cassette",
            "Light saturation and a touch of hiss",
            ParamValues {
                noise: 5.0,
                wobble: 5.0,
                saturation: 20.0,
                age: 10.0,
                filter_cutoff: 90.0,
                mix: 70.0,
                ..init
            },
        ),
    ]
}
