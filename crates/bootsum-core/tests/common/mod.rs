pub mod mem_fs;
