//! TypeScript bindings for the web UI are generated by the build script into
//! `generated/typescript`.
