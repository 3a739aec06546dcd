//! Oracle dice and oracle cards as spendable resources.
//!
//! A [`Resource`] names "a die of color X" or "a card of color X". It may
//! carry a declared recoloring: the owner intends to pay `recolor_cost`
//! favor to turn it `recolor_cost` steps around the color wheel when it is
//! spent. The declaration is not part of the resource's identity, so two
//! resources compare equal whenever their kind and base color match.

use crate::board::CoreColor;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Which pool a resource is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Oracle die, rerolled every turn
    Die,
    /// Oracle card, kept between turns; one may be spent per turn
    Card,
}

/// A die or card, optionally declared for recoloring
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Resource {
    pub kind: ResourceKind,
    pub base_color: CoreColor,
    #[serde(default)]
    pub recolor_cost: u32,
}

impl Resource {
    /// A die with no recoloring
    pub const fn die(color: CoreColor) -> Self {
        Self {
            kind: ResourceKind::Die,
            base_color: color,
            recolor_cost: 0,
        }
    }

    /// A card with no recoloring
    pub const fn card(color: CoreColor) -> Self {
        Self {
            kind: ResourceKind::Card,
            base_color: color,
            recolor_cost: 0,
        }
    }

    /// The color this resource spends as
    pub fn effective_color(&self) -> CoreColor {
        self.base_color.advanced(self.recolor_cost)
    }

    /// The same resource with a different declared recoloring
    pub fn with_recoloring(self, cost: u32) -> Self {
        Self {
            recolor_cost: cost,
            ..self
        }
    }

    /// The same resource with the recoloring dropped
    pub fn without_recoloring(self) -> Self {
        self.with_recoloring(0)
    }

    pub fn is_card(&self) -> bool {
        self.kind == ResourceKind::Card
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.base_color == other.base_color
    }
}

impl Eq for Resource {}

impl Hash for Resource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.base_color.hash(state);
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            ResourceKind::Die => "die",
            ResourceKind::Card => "card",
        };
        if self.recolor_cost == 0 {
            write!(f, "{} {}", self.base_color, kind)
        } else {
            write!(
                f,
                "{} {} (as {} for {} favor)",
                self.base_color,
                kind,
                self.effective_color(),
                self.recolor_cost
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_recolor_keeps_base_color() {
        for color in CoreColor::ALL {
            assert_eq!(Resource::die(color).effective_color(), color);
            assert_eq!(Resource::card(color).effective_color(), color);
        }
    }

    #[test]
    fn test_effective_color_has_period_six() {
        for color in CoreColor::ALL {
            for cost in 0..6 {
                let a = Resource::card(color).with_recoloring(cost);
                let b = Resource::card(color).with_recoloring(cost + 6);
                assert_eq!(a.effective_color(), b.effective_color());
            }
        }
    }

    #[test]
    fn test_black_card_recolored_twice() {
        let card = Resource::card(CoreColor::Black).with_recoloring(2);
        assert_eq!(card.effective_color(), CoreColor::Green);
        assert_eq!(card.without_recoloring().effective_color(), CoreColor::Black);
    }

    #[test]
    fn test_equality_ignores_recolor_cost() {
        let plain = Resource::die(CoreColor::Red);
        let recolored = plain.with_recoloring(3);
        assert_eq!(plain, recolored);
        assert_ne!(plain, Resource::card(CoreColor::Red));
        assert_ne!(plain, Resource::die(CoreColor::Pink));
    }

    #[test]
    fn test_display() {
        assert_eq!(Resource::die(CoreColor::Red).to_string(), "red die");
        assert_eq!(
            Resource::card(CoreColor::Red).with_recoloring(1).to_string(),
            "red card (as pink for 1 favor)"
        );
    }
}
