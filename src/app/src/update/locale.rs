use crux_core::Command;

use crate::events::{Event, LocaleEvent};
use crate::i18n::{persisted_locale, Locale};
use crate::model::Model;
use crate::update_field;
use crate::Effect;

/// Handle locale selection. Persisting the choice is up to the shell.
pub fn handle(event: LocaleEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        LocaleEvent::SwitchLocale { locale } => match Locale::from_code(&locale) {
            Some(locale) => update_field!(model.locale, locale),
            None => {
                log::warn!("unsupported locale {locale:?}");
                model.set_error_and_render(format!("Unsupported locale: {locale}"))
            }
        },
        LocaleEvent::RestoreLocale { stored } => match persisted_locale(stored.as_deref()) {
            Some(locale) => update_field!(model.locale, locale),
            None => Command::done(),
        },
    }
}
