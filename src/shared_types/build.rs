use anyhow::Result;
use crux_core::typegen::TypeGen;
use std::path::PathBuf;
use switch_control_core::{
    events::{ChannelEvent, LocaleEvent, StatusEvent, UiEvent, WifiEvent},
    i18n::Locale,
    types::{
        ChannelType, ConnectionState, IpMethod, Resource, SwitchDirection, WifiMode,
    },
    App,
};

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=../app");

    let mut gen = TypeGen::new();

    gen.register_app::<App>()?;

    // Explicitly register domain event enums to ensure all variants are traced
    gen.register_type::<ChannelEvent>()?;
    gen.register_type::<WifiEvent>()?;
    gen.register_type::<StatusEvent>()?;
    gen.register_type::<LocaleEvent>()?;
    gen.register_type::<UiEvent>()?;

    gen.register_type::<ChannelType>()?;
    gen.register_type::<SwitchDirection>()?;
    gen.register_type::<WifiMode>()?;
    gen.register_type::<IpMethod>()?;
    gen.register_type::<ConnectionState>()?;
    gen.register_type::<Locale>()?;
    gen.register_type::<Resource>()?;

    let output_root = PathBuf::from("./generated");

    gen.typescript("shared_types", output_root.join("typescript"))?;

    Ok(())
}
