pub mod constants;
mod wait_for_element;

pub use wait_for_element::wait_for_element;
