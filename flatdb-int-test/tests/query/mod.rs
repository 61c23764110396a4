mod find_test;
mod ordering_test;
