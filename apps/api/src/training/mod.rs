// Training Studio: the freelancer's standing instructions and style examples.

pub mod editor;
pub mod handlers;
