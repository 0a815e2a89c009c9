// src/vendas/mod.rs

// Structs de venda, itens de venda e estado
pub mod vendas_structs;
// Motor de fechamento de venda (checkout, cancelamento, conclusão, consultas)
pub mod vendas_service;
// Rotas HTTP de vendas
pub mod vendas_router;
