// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod forms;
pub mod keys;
pub mod layout;
pub mod list;
pub mod model;
pub mod overlay;
pub mod state;
pub mod status;
pub mod storage;
pub mod view;
pub mod window;

pub use forms::*;
pub use keys::*;
pub use layout::*;
pub use list::*;
pub use model::*;
pub use overlay::*;
pub use state::*;
pub use status::*;
pub use storage::*;
pub use window::*;
