mod criteria_query_test;
mod find_all_test;
