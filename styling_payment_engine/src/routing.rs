//! Maps a callback's `formType` to the booking collection that holds the record being paid for.
use log::warn;

use crate::db_types::FormType;

/// Routes payment callbacks to booking collections.
///
/// Callbacks from older checkout pages do not always carry a form type. Those are routed to `default`, which is
/// corporate styling unless configured otherwise. With no default, unroutable callbacks leave bookings untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionRouter {
    default: Option<FormType>,
}

impl Default for CollectionRouter {
    fn default() -> Self {
        Self { default: Some(FormType::CorporateStyling) }
    }
}

impl CollectionRouter {
    pub fn new(default: Option<FormType>) -> Self {
        Self { default }
    }

    /// A router that never guesses. Only callbacks with a recognised form type are routed.
    pub fn strict() -> Self {
        Self { default: None }
    }

    pub fn default_form_type(&self) -> Option<FormType> {
        self.default
    }

    pub fn route_for(&self, form_type: Option<FormType>) -> Option<FormType> {
        form_type.or(self.default)
    }

    /// Parses the raw form type from the callback and routes it. Unrecognised values are treated as absent.
    pub fn route_raw(&self, form_type: Option<&str>) -> Option<FormType> {
        let parsed = form_type.and_then(|s| {
            s.parse::<FormType>()
                .map_err(|e| warn!("💳️ {e}. Falling back to the default collection ({:?}).", self.default))
                .ok()
        });
        self.route_for(parsed)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn known_types_route_to_their_own_collection() {
        let router = CollectionRouter::default();
        for t in FormType::ALL {
            assert_eq!(router.route_for(Some(t)), Some(t));
            assert_eq!(router.route_raw(Some(t.as_str())), Some(t));
        }
    }

    #[test]
    fn default_policy_is_corporate_styling() {
        let router = CollectionRouter::default();
        assert_eq!(router.route_for(None), Some(FormType::CorporateStyling));
        assert_eq!(router.route_raw(Some("bridal_party")), Some(FormType::CorporateStyling));
        assert_eq!(router.route_raw(None), Some(FormType::CorporateStyling));
    }

    #[test]
    fn strict_router_does_not_guess() {
        let router = CollectionRouter::strict();
        assert_eq!(router.route_raw(None), None);
        assert_eq!(router.route_raw(Some("bridal_party")), None);
        assert_eq!(router.route_raw(Some("makeup_training")), Some(FormType::MakeupTraining));
    }

    #[test]
    fn configurable_default() {
        let router = CollectionRouter::new(Some(FormType::SoftSkills));
        assert_eq!(router.route_for(None), Some(FormType::SoftSkills));
        assert_eq!(router.default_form_type(), Some(FormType::SoftSkills));
    }
}
