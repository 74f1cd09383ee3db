// Upload surfaces: validation shared by the screening upload (forwarded to the
// analysis service) and the resume library upload (stored locally).

pub mod form;
pub mod handlers;
pub mod screening;
pub mod text;
pub mod validation;
