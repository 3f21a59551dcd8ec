mod repository_crud_test;
mod update_latest_test;
