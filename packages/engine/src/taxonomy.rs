use std::fmt;

use serde::{Deserialize, Serialize};

/// Weapon archetypes an asset can belong to.
///
/// Serialized as lowercase tokens; unknown tokens fail deserialization
/// rather than being coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponType {
    Sword,
    Axe,
    Mace,
    Bow,
    Spear,
    Dagger,
    Staff,
    Shield,
    Gun,
    Rifle,
    Custom,
}

/// Part slots a weapon can be assembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartType {
    Handle,
    Blade,
    Guard,
    Pommel,
    Head,
    Shaft,
    Grip,
    Barrel,
    Stock,
    Sight,
    Magazine,
    Trigger,
    Custom,
}

/// Texture map roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureType {
    Diffuse,
    Normal,
    Roughness,
    Metallic,
    Emissive,
    Ao,
    Height,
    Opacity,
    Custom,
}

impl WeaponType {
    pub const ALL: &'static [WeaponType] = &[
        Self::Sword,
        Self::Axe,
        Self::Mace,
        Self::Bow,
        Self::Spear,
        Self::Dagger,
        Self::Staff,
        Self::Shield,
        Self::Gun,
        Self::Rifle,
        Self::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sword => "sword",
            Self::Axe => "axe",
            Self::Mace => "mace",
            Self::Bow => "bow",
            Self::Spear => "spear",
            Self::Dagger => "dagger",
            Self::Staff => "staff",
            Self::Shield => "shield",
            Self::Gun => "gun",
            Self::Rifle => "rifle",
            Self::Custom => "custom",
        }
    }

    /// Part types that can be mounted on this weapon archetype.
    ///
    /// `PartType::Custom` is accepted everywhere and is not repeated in the
    /// concrete lists.
    pub fn allowed_parts(&self) -> &'static [PartType] {
        use PartType::*;
        match self {
            Self::Sword => &[Handle, Grip, Blade, Guard, Pommel],
            Self::Dagger => &[Handle, Grip, Blade, Guard],
            Self::Axe | Self::Mace => &[Handle, Grip, Head],
            Self::Spear | Self::Staff => &[Handle, Grip, Shaft, Head],
            Self::Bow | Self::Shield => &[Handle, Grip],
            Self::Gun => &[Handle, Grip, Barrel, Trigger, Magazine, Sight],
            Self::Rifle => &[Stock, Grip, Barrel, Trigger, Magazine, Sight],
            Self::Custom => PartType::ALL,
        }
    }
}

impl PartType {
    pub const ALL: &'static [PartType] = &[
        Self::Handle,
        Self::Blade,
        Self::Guard,
        Self::Pommel,
        Self::Head,
        Self::Shaft,
        Self::Grip,
        Self::Barrel,
        Self::Stock,
        Self::Sight,
        Self::Magazine,
        Self::Trigger,
        Self::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Handle => "handle",
            Self::Blade => "blade",
            Self::Guard => "guard",
            Self::Pommel => "pommel",
            Self::Head => "head",
            Self::Shaft => "shaft",
            Self::Grip => "grip",
            Self::Barrel => "barrel",
            Self::Stock => "stock",
            Self::Sight => "sight",
            Self::Magazine => "magazine",
            Self::Trigger => "trigger",
            Self::Custom => "custom",
        }
    }
}

impl TextureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Diffuse => "diffuse",
            Self::Normal => "normal",
            Self::Roughness => "roughness",
            Self::Metallic => "metallic",
            Self::Emissive => "emissive",
            Self::Ao => "ao",
            Self::Height => "height",
            Self::Opacity => "opacity",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for WeaponType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TextureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `part` can be mounted on `weapon`.
///
/// A custom weapon accepts every part type, and a custom part is accepted on
/// every weapon as the escape hatch for unclassified geometry.
pub fn is_valid_part_for_weapon(weapon: WeaponType, part: PartType) -> bool {
    weapon == WeaponType::Custom
        || part == PartType::Custom
        || weapon.allowed_parts().contains(&part)
}
