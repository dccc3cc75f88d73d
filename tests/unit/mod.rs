mod book_tests;
mod manager_tests;
mod mass_cancel_tests;
mod snapshot_tests;
