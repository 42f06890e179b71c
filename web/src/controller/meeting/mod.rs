pub(crate) mod ai_controller;
