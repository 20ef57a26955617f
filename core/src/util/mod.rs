mod util;
pub use util::{form_get, getenv, getenv_default};
