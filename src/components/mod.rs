pub mod mint_form;
pub mod wallet;
